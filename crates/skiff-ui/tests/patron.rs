use std::sync::Arc;

use skiff_test_support::fixtures::wait_for;
use skiff_test_support::mocks::{FakePatronService, RecordingNavigator};
use skiff_ui::Route;
use skiff_ui::preferences::{AccountState, PATREON_URL, PatronAccount, PatronViewModel};

fn screen() -> (Arc<FakePatronService>, Arc<RecordingNavigator>, PatronViewModel) {
    let service = Arc::new(FakePatronService::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let view_model = PatronViewModel::new(
        Arc::clone(&service) as _,
        Arc::clone(&navigator) as _,
    );
    (service, navigator, view_model)
}

#[tokio::test]
async fn outputs_follow_the_account() {
    let (service, _navigator, view_model) = screen();
    let mut outputs = view_model.outputs();
    assert_eq!(outputs.borrow().link_button_title, "Link Patreon account");
    assert!(!outputs.borrow().patron_box_visible);

    service.set_account(PatronAccount {
        state: AccountState::Linked,
        is_patron: true,
        is_full_version: false,
    });
    let linked = wait_for(&mut outputs, |outputs| outputs.patron_box_visible).await;
    assert_eq!(linked.link_button_title, "Refresh Patreon status");
    assert!(linked.become_patron_hidden);
    assert_eq!(linked.version_text, "Patron");
}

#[tokio::test]
async fn link_shows_spinner() {
    let (service, _navigator, view_model) = screen();
    let mut outputs = view_model.outputs();

    view_model.link_account().await;
    assert_eq!(service.link_requests(), 1);
    assert!(wait_for(&mut outputs, |outputs| outputs.loading).await.loading);
}

#[tokio::test]
async fn become_patron_opens_patreon() {
    let (_service, navigator, view_model) = screen();
    view_model.become_patron();
    let url = url::Url::parse(PATREON_URL).expect("valid url");
    assert_eq!(navigator.routes(), [Route::External { url }]);
}
