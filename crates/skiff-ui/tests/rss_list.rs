use std::sync::Arc;

use skiff_test_support::fixtures::{settle, wait_for};
use skiff_test_support::mocks::{RecordingNavigator, ScriptedDialogs};
use skiff_ui::rss::{FeedProvider, MemoryFeedProvider, RSS_SECTION_ID, RssListViewModel};
use skiff_ui::{IndexPath, Route};

fn at(row: usize) -> IndexPath {
    IndexPath { section: 0, row }
}

struct Screen {
    provider: Arc<MemoryFeedProvider>,
    navigator: Arc<RecordingNavigator>,
    dialogs: Arc<ScriptedDialogs>,
    list: RssListViewModel,
}

fn screen() -> Screen {
    let provider = Arc::new(MemoryFeedProvider::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let dialogs = Arc::new(ScriptedDialogs::default());
    let list = RssListViewModel::new(
        Arc::clone(&provider) as Arc<dyn FeedProvider>,
        Arc::clone(&navigator) as _,
        Arc::clone(&dialogs) as _,
    );
    Screen {
        provider,
        navigator,
        dialogs,
        list,
    }
}

#[tokio::test]
async fn construction_requests_a_refresh() {
    let screen = screen();
    settle().await;
    assert_eq!(screen.provider.fetch_count(), 1);
    assert_eq!(screen.list.sections().borrow()[0].id, RSS_SECTION_ID);
}

#[tokio::test]
async fn add_feed_prompts_and_subscribes() {
    let screen = screen();
    let mut sections = screen.list.sections();

    screen.dialogs.answer_text(None);
    screen.list.add_feed().await;
    assert!(screen.provider.feeds().borrow().is_empty());

    screen.dialogs.answer_text(Some("https://example.org/feed.xml"));
    screen.list.add_feed().await;
    let added = wait_for(&mut sections, |sections| sections[0].rows.len() == 1).await;
    assert_eq!(added[0].rows[0].url.as_str(), "https://example.org/feed.xml");

    let prompts = screen.dialogs.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0].placeholder, "https://");
}

#[tokio::test]
async fn invalid_address_is_logged_not_added() {
    let screen = screen();
    screen.dialogs.answer_text(Some("ftp://example.org/feed"));
    screen.list.add_feed().await;
    assert!(screen.provider.feeds().borrow().is_empty());
}

#[tokio::test]
async fn remove_availability_follows_selection() {
    let screen = screen();
    let mut available = screen.list.is_remove_available();
    assert!(!*available.borrow());

    screen.list.set_selection(vec![at(0)]);
    assert!(wait_for(&mut available, |available| *available).await);

    screen.list.set_selection(Vec::new());
    assert!(!wait_for(&mut available, |available| !*available).await);
}

#[tokio::test]
async fn remove_selected_requires_confirmation() {
    let screen = screen();
    let mut sections = screen.list.sections();
    screen
        .provider
        .add_feed("https://one.example/rss")
        .await
        .expect("valid feed");
    screen
        .provider
        .add_feed("https://two.example/rss")
        .await
        .expect("valid feed");
    wait_for(&mut sections, |sections| sections[0].rows.len() == 2).await;

    screen.list.set_selection(vec![at(1)]);
    screen.dialogs.answer_alert(Some(0));
    screen.list.remove_selected().await;
    assert_eq!(screen.provider.feeds().borrow().len(), 2);

    screen.dialogs.answer_alert(Some(1));
    screen.list.remove_selected().await;
    let remaining = wait_for(&mut sections, |sections| sections[0].rows.len() == 1).await;
    assert_eq!(remaining[0].rows[0].title, "one.example");
    assert_eq!(screen.dialogs.alerts().len(), 2);

    let mut available = screen.list.is_remove_available();
    assert!(!wait_for(&mut available, |available| !*available).await);
}

#[tokio::test]
async fn empty_selection_removes_nothing_without_prompt() {
    let screen = screen();
    screen.list.remove_selected().await;
    assert!(screen.dialogs.alerts().is_empty());
}

#[tokio::test]
async fn selecting_a_feed_opens_its_channel() {
    let screen = screen();
    let mut sections = screen.list.sections();
    let feed = screen
        .provider
        .add_feed("https://one.example/rss")
        .await
        .expect("valid feed");
    wait_for(&mut sections, |sections| sections[0].rows.len() == 1).await;

    screen.list.select_feed(at(0));
    screen.list.select_feed(at(4));

    assert_eq!(
        screen.navigator.routes(),
        [Route::RssChannel { feed_id: feed.id }]
    );
}
