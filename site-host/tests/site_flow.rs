//! 站点级流程测试：脚本驱动的导航、语言切换、慢渲染和标题揭示。

use std::rc::Rc;
use std::time::Duration;

use page_transition::{
    Activation, ConfigError, IgnoreReason, Locale, TransitionError, TransitionEvent,
    TransitionKind, use_page_transition,
};
use site_host::{Site, SiteConfig, SiteError, Step, demo_steps, parse_steps};

const SETTLE: Duration = Duration::from_millis(200);
/// 足够让最长的进入动画播完
const LONG_SETTLE: Duration = Duration::from_secs(2);

fn config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.transition.overlay.columns = 4;
    config.transition.overlay.rows = 3;
    config.transition.overlay.seed = Some(7);
    config
}

fn steps(raw: &[&str]) -> Vec<Step> {
    parse_steps(raw).unwrap()
}

fn full_transition(kind: TransitionKind, pathname: &str) -> Vec<TransitionEvent> {
    vec![
        TransitionEvent::ExitStarted(kind),
        TransitionEvent::ExitCompleted(kind),
        TransitionEvent::StateLocked(kind),
        TransitionEvent::FramesPainted,
        TransitionEvent::Navigated {
            pathname: pathname.to_string(),
        },
        TransitionEvent::EnterStarted(kind),
        TransitionEvent::Settled,
    ]
}

#[tokio::test(start_paused = true)]
async fn test_demo_script() {
    let site = Site::new(config()).unwrap();
    let reports = site.run_script(&demo_steps(), SETTLE).await;
    assert_eq!(reports.len(), 5);

    assert_eq!(reports[0].href, "/en/about");
    assert_eq!(
        reports[0].activation,
        Some(Activation::Navigated(TransitionKind::RotateScale))
    );
    assert_eq!(
        reports[0].events,
        full_transition(TransitionKind::RotateScale, "/about")
    );

    assert_eq!(reports[1].href, "/en");
    assert_eq!(
        reports[1].events,
        full_transition(TransitionKind::DoorSwing, "/")
    );

    assert_eq!(reports[2].href, "/en/projects");
    assert_eq!(
        reports[2].events,
        full_transition(TransitionKind::Overlay, "/projects")
    );

    // 语言切换不是过渡，路径不变
    assert_eq!(reports[3].href, "/ar/projects");
    assert!(reports[3].events.is_empty());
    assert_eq!(reports[3].activation, None);

    assert_eq!(reports[4].href, "/ar/contact");
    assert_eq!(
        reports[4].events,
        vec![TransitionEvent::PlainNavigation {
            pathname: "/contact".to_string()
        }]
    );

    // 每步的事件已交给报告，日志不累积
    assert!(site.transitions().events().is_empty());

    let ctx = site.transitions().context();
    assert!(!ctx.is_transitioning());
    assert!(ctx.transition_done());
}

#[tokio::test(start_paused = true)]
async fn test_locale_switch_rerenders_header_and_page() {
    let site = Site::new(config()).unwrap();
    site.run_script(&steps(&["/about", "locale:ar"]), SETTLE).await;

    let document = site.transitions().document();
    let nav = document.get_element_by_id("site-nav").unwrap();
    assert_eq!(nav.children()[0].text(), "الرئيسية");

    let wrapper = site.shell().current().unwrap();
    assert_eq!(wrapper.class(), "smooth-wrapper rtl");
    let content = site.transitions().content_node().unwrap();
    assert_eq!(content.children()[0].children()[0].text(), "من نحن");
    assert_eq!(site.transitions().router().history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_heading_revealed_after_transition() {
    let site = Site::new(config()).unwrap();
    site.run_script(&steps(&["/about@door-swing"]), LONG_SETTLE)
        .await;

    let content = site.transitions().content_node().unwrap();
    assert!(content.style().is_identity());

    let reveal = content.children()[1].clone();
    assert_eq!(reveal.class(), "text-reveal page-title");
    let words: Vec<String> = reveal.children().iter().map(|w| w.text()).collect();
    assert_eq!(words, ["About", "Us"]);
    assert!(reveal.children().iter().all(|w| w.style().is_identity()));
}

#[tokio::test(start_paused = true)]
async fn test_slow_page_within_timeout_still_enters() {
    let mut config = config();
    config.mount_delay_ms = 20;
    let site = Site::new(config).unwrap();

    let reports = site
        .run_script(&steps(&["/services@swirl"]), LONG_SETTLE)
        .await;
    assert_eq!(
        reports[0].events,
        full_transition(TransitionKind::Swirl, "/services")
    );
    let content = site.transitions().content_node().unwrap();
    assert!(content.style().is_identity());
}

#[tokio::test(start_paused = true)]
async fn test_slow_page_past_timeout_settles() {
    let mut config = config();
    config.mount_delay_ms = 80;
    let site = Site::new(config).unwrap();

    let reports = site.run_script(&steps(&["/projects"]), SETTLE).await;
    let events = &reports[0].events;
    assert!(events.contains(&TransitionEvent::EnterTimedOut(TransitionKind::RotateScale)));
    assert_eq!(events.last(), Some(&TransitionEvent::Settled));

    // 页面稍后照常挂载，过渡状态没有卡住
    let content = site.transitions().content_node().unwrap();
    assert_eq!(content.children()[0].class(), "page page-projects");
    assert!(site.transitions().context().transition_done());
}

#[tokio::test(start_paused = true)]
async fn test_link_to_current_page_is_ignored() {
    let site = Site::new(config()).unwrap();
    let reports = site.run_script(&steps(&["/"]), SETTLE).await;

    assert_eq!(
        reports[0].activation,
        Some(Activation::Ignored(IgnoreReason::SameRoute))
    );
    assert!(reports[0].events.is_empty());
    assert_eq!(reports[0].href, "/en");
}

#[test]
fn test_scope_provides_context() {
    let site = Site::new(config()).unwrap();
    let ctx = use_page_transition(site.scope());
    assert!(Rc::ptr_eq(&ctx, site.transitions().context()));
}

#[test]
fn test_starts_in_configured_locale() {
    let mut config = config();
    config.locale = Locale::Ar;
    let site = Site::new(config).unwrap();

    assert_eq!(site.location().href(), "/ar");
    let content = site.transitions().content_node().unwrap();
    assert_eq!(content.children()[0].children()[0].text(), "نبني ما يدوم");
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = config();
    config.frame_rate = 0;
    assert!(matches!(
        Site::new(config),
        Err(SiteError::Transition(TransitionError::Config(
            ConfigError::Validation(_)
        )))
    ));
}
