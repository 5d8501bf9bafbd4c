use tagsmith::application::{AuthContext, TagEditor, TagExporter, TagGenerationService};
use tagsmith::domain::{
    ApiError, ApiUsage, CopyOutcome, DomainError, ExportFormat, ExportScope, PlanTier, TagSet,
};
use tagsmith::util::testing::{
    sample_user, MemoryTokenStore, MemoryWorkspaceRepository, MockAuthGateway, MockTagGenerator,
    RecordingClipboard,
};

fn logged_in(user: tagsmith::domain::User) -> AuthContext<MockAuthGateway, MemoryTokenStore> {
    let gateway = MockAuthGateway::builder()
        .with_login("ada@example.com", "secret", "access-1", user)
        .build();
    let mut auth = AuthContext::new(gateway, MemoryTokenStore::new());
    auth.login("ada@example.com", "secret").unwrap();
    auth
}

#[test]
fn given_logged_in_user_when_generating_editing_and_exporting_then_clipboard_gets_selection() {
    // Arrange
    let mut auth = logged_in(sample_user(PlanTier::Free));
    let repo = MemoryWorkspaceRepository::default();
    let editor = TagEditor::new(repo.clone());
    let service = TagGenerationService::new(MockTagGenerator::returning(&[
        "::Topic/AI",
        "@Person/Ada Lovelace",
        "//Location/London",
    ]));

    // Act
    let count = editor
        .edit(|ws| service.generate(&mut auth, ws, "Ada Lovelace in London"))
        .unwrap();
    editor.set_base_url("https://s.example/search", true).unwrap();
    editor.rename("//Location/London", "//Location/Greater London").unwrap();
    editor.select("::Topic/AI").unwrap();
    editor.select("//Location/Greater London").unwrap();
    let exporter = TagExporter::new();
    let payload = exporter
        .render(&repo.current(), ExportFormat::Rich, ExportScope::Selected)
        .unwrap();
    let mut clipboard = RecordingClipboard::default();
    let outcome = exporter.copy(&mut clipboard, &payload).unwrap();

    // Assert
    assert_eq!(count, 3);
    assert_eq!(outcome, CopyOutcome::Rich);
    assert_eq!(
        clipboard.plain.as_deref(),
        Some("::Topic/AI\n//Location/Greater London")
    );
    let html = clipboard.html.unwrap();
    assert!(html.contains(r#"href="https://s.example/search?q=%3A%3ATopic%2FAI""#));
    assert!(html.contains(
        r#"href="https://s.example/search?q=%2F%2FLocation%2FLondon""#
    ));
    assert!(!html.contains("Ada Lovelace"));
    assert_eq!(auth.gateway().usage_increments(), 1);
    assert_eq!(auth.user().unwrap().api_usage.requests_this_month, 1);
}

#[test]
fn given_exhausted_free_quota_when_generating_then_blocked_without_calling_service() {
    // Arrange
    let mut user = sample_user(PlanTier::Free);
    user.api_usage = ApiUsage::new(20, 20);
    let mut auth = logged_in(user);
    let generator = MockTagGenerator::returning(&["::Topic/AI"]);
    let service = TagGenerationService::new(generator.clone());
    let repo = MemoryWorkspaceRepository::with(TagSet::from_tags(["keep"]));
    let editor = TagEditor::new(repo.clone());

    // Act
    let err = editor
        .edit(|ws| service.generate(&mut auth, ws, "some text"))
        .unwrap_err();

    // Assert
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::QuotaExceeded { used: 20, limit: 20 })
    ));
    assert_eq!(generator.calls(), 0);
    assert_eq!(repo.saves(), 0);
    assert_eq!(repo.current().tags(), ["keep"]);
}

#[test]
fn given_unlimited_plan_when_usage_is_high_then_generation_still_allowed() {
    let mut user = sample_user(PlanTier::Pro);
    user.api_usage = ApiUsage::new(999, -1);
    let mut auth = logged_in(user);
    let service = TagGenerationService::new(MockTagGenerator::returning(&["::Topic/AI"]));
    let mut workspace = TagSet::new();

    let count = service.generate(&mut auth, &mut workspace, "text").unwrap();

    assert_eq!(count, 1);
}

#[test]
fn given_failing_generator_when_generating_then_previous_workspace_untouched() {
    // Arrange
    let mut auth = logged_in(sample_user(PlanTier::Plus));
    let mut before = TagSet::from_tags(["::Topic/Old", "@Person/Old"]);
    before.select("::Topic/Old").unwrap();
    before.set_link("@Person/Old", "https://example.com/old").unwrap();
    let repo = MemoryWorkspaceRepository::with(before.clone());
    let editor = TagEditor::new(repo.clone());
    let service = TagGenerationService::new(MockTagGenerator::failing(ApiError::Generation(
        "Failed to generate tags".to_string(),
    )));

    // Act
    let result = editor.edit(|ws| service.generate(&mut auth, ws, "text"));

    // Assert
    assert!(result.is_err());
    assert_eq!(repo.current(), before);
    assert_eq!(auth.gateway().usage_increments(), 0);
}

#[test]
fn given_no_rich_clipboard_when_exporting_then_falls_back_to_plain_text() {
    let workspace = TagSet::from_tags(["A", "B"]);
    let exporter = TagExporter::new();
    let payload = exporter
        .render(&workspace, ExportFormat::Rich, ExportScope::All)
        .unwrap();
    let mut clipboard = RecordingClipboard {
        fail_rich: true,
        fail_legacy: true,
        ..Default::default()
    };

    let outcome = exporter.copy(&mut clipboard, &payload).unwrap();

    assert_eq!(outcome, CopyOutcome::PlainText);
    assert_eq!(clipboard.plain.as_deref(), Some("A\nB"));
}

#[test]
fn given_nothing_selected_when_exporting_selection_then_nothing_to_export() {
    let workspace = TagSet::from_tags(["A", "B"]);

    let err = TagExporter::new()
        .render(&workspace, ExportFormat::Plain, ExportScope::Selected)
        .unwrap_err();

    assert!(matches!(err, DomainError::NothingToExport));
}
