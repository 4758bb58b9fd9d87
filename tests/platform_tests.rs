// Host-side tests for viewer mode selection.

mod common;

use common::platform::*;

#[test]
fn ar_support_wins() {
    assert_eq!(choose_mode(true, "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"), ViewerMode::ImmersiveAr);
    assert_eq!(choose_mode(true, "Mozilla/5.0 (Linux; Android 14)"), ViewerMode::ImmersiveAr);
}

#[test]
fn ios_without_ar_uses_quick_look() {
    for ua in [
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
        "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X)",
        "Mozilla/5.0 (iPod touch; CPU iPhone OS 12_5)",
        "IPHONE",
    ] {
        assert!(is_ios(ua), "{ua}");
        assert_eq!(choose_mode(false, ua), ViewerMode::QuickLook, "{ua}");
    }
}

#[test]
fn everything_else_is_inline() {
    for ua in ["Mozilla/5.0 (X11; Linux x86_64)", "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)", ""] {
        assert!(!is_ios(ua));
        assert_eq!(choose_mode(false, ua), ViewerMode::Inline);
    }
}
