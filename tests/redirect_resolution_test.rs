//! # 重定向解析集成测试
//!
//! 覆盖角色与入驻状态的组合、深链接一次性消费与延迟跳转的取消语义

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;

use whispr_session::auth::redirect::{
    ATTENDEE_DASHBOARD, ATTENDEE_ONBOARDING, ORGANIZER_DASHBOARD,
};
use whispr_session::auth::{RedirectResolver, Role, ScheduledRedirect, login_url};
use whispr_session::storage::{
    MemoryStorage, StorageKey, StorageProviderType, UnifiedStorageManager,
};

/// 重定向测试套件
struct RedirectTestSuite {
    storage: Arc<UnifiedStorageManager>,
    resolver: RedirectResolver,
}

impl RedirectTestSuite {
    fn setup() -> Self {
        let storage = Arc::new(UnifiedStorageManager::from_provider(
            StorageProviderType::Memory(MemoryStorage::new(64)),
        ));
        let resolver = RedirectResolver::new(Arc::clone(&storage));
        Self { storage, resolver }
    }

    async fn saved_redirect_cleared(&self) -> bool {
        !self
            .storage
            .exists(StorageKey::PostAuthRedirect.build())
            .await
            .unwrap()
    }
}

#[rstest]
#[case::onboarded(true)]
#[case::not_onboarded(false)]
#[tokio::test]
async fn organizer_with_saved_redirect_always_wins(#[case] is_onboarded: bool) {
    let suite = RedirectTestSuite::setup();
    suite.resolver.save_intent("/events/7").await.unwrap();

    // 主办方没有入驻概念，入驻标记不影响结果
    let target = suite
        .resolver
        .resolve(Role::Organizer, is_onboarded)
        .await
        .unwrap();

    assert_eq!(target, "/events/7");
    assert!(suite.saved_redirect_cleared().await);
}

#[tokio::test]
async fn organizer_without_saved_redirect_gets_dashboard() {
    let suite = RedirectTestSuite::setup();

    let target = suite.resolver.resolve(Role::Organizer, false).await.unwrap();

    assert_eq!(target, ORGANIZER_DASHBOARD);
}

#[tokio::test]
async fn attendee_not_onboarded_always_gets_onboarding() {
    let suite = RedirectTestSuite::setup();
    suite.resolver.save_intent("/events/9/apply").await.unwrap();

    let target = suite.resolver.resolve(Role::Attendee, false).await.unwrap();

    // 深链接被丢弃但仍被清除：过期意图不得跨会话残留
    assert_eq!(target, ATTENDEE_ONBOARDING);
    assert!(suite.saved_redirect_cleared().await);
    println!("✅ 未入驻参会者强制进入入驻流程");
}

#[tokio::test]
async fn attendee_onboarded_prefers_saved_redirect() {
    let suite = RedirectTestSuite::setup();
    suite.resolver.save_intent("/events/9/apply").await.unwrap();

    let target = suite.resolver.resolve(Role::Attendee, true).await.unwrap();

    assert_eq!(target, "/events/9/apply");
    assert!(suite.saved_redirect_cleared().await);
}

#[tokio::test]
async fn attendee_onboarded_without_saved_gets_dashboard() {
    let suite = RedirectTestSuite::setup();

    let target = suite.resolver.resolve(Role::Attendee, true).await.unwrap();

    assert_eq!(target, ATTENDEE_DASHBOARD);
}

#[tokio::test]
async fn empty_saved_redirect_is_ignored() {
    let suite = RedirectTestSuite::setup();
    suite.resolver.save_intent("").await.unwrap();

    let target = suite.resolver.resolve(Role::Attendee, true).await.unwrap();

    assert_eq!(target, ATTENDEE_DASHBOARD);
}

#[tokio::test]
async fn saved_redirect_consumed_exactly_once() {
    let suite = RedirectTestSuite::setup();
    suite.resolver.save_intent("/events/1").await.unwrap();

    let first = suite.resolver.resolve(Role::Organizer, false).await.unwrap();
    let second = suite.resolver.resolve(Role::Organizer, false).await.unwrap();

    assert_eq!(first, "/events/1");
    assert_eq!(second, ORGANIZER_DASHBOARD);
}

#[rstest]
#[case::organizer(Role::Organizer, "/auth?role=organizer")]
#[case::attendee(Role::Attendee, "/auth?role=attendee")]
fn login_url_is_role_scoped(#[case] role: Role, #[case] expected: &str) {
    assert_eq!(login_url(role), expected);
}

#[tokio::test]
async fn scheduled_redirect_fires_after_delay() {
    let (tx, rx) = tokio::sync::oneshot::channel::<String>();

    let scheduled = ScheduledRedirect::schedule(
        "/auth?role=attendee".to_string(),
        Duration::from_millis(30),
        move |target| {
            let _ = tx.send(target);
        },
    );
    assert_eq!(scheduled.target(), "/auth?role=attendee");

    let fired = tokio::time::timeout(Duration::from_millis(500), rx)
        .await
        .expect("延迟跳转应在超时前触发")
        .expect("跳转回调应发送目标地址");
    assert_eq!(fired, "/auth?role=attendee");

    drop(scheduled);
    println!("✅ 延迟跳转按时触发");
}

#[tokio::test]
async fn cancelled_redirect_never_fires() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    let scheduled = ScheduledRedirect::schedule(
        "/auth?role=organizer".to_string(),
        Duration::from_millis(30),
        move |target| {
            let _ = tx.send(target);
        },
    );
    scheduled.cancel();

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(rx.try_recv().is_err(), "已取消的跳转不应触发");
}

#[tokio::test]
async fn dropped_redirect_is_abandoned() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    // 页面卸载语义：句柄被丢弃后挂起的跳转静默放弃
    let scheduled = ScheduledRedirect::schedule(
        "/auth?role=attendee".to_string(),
        Duration::from_millis(30),
        move |target| {
            let _ = tx.send(target);
        },
    );
    drop(scheduled);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(rx.try_recv().is_err(), "句柄被丢弃后跳转不应触发");
}
