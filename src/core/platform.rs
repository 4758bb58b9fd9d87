/// How the page presents models, decided once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerMode {
    /// WebXR immersive-ar with surface placement.
    ImmersiveAr,
    /// Hand models to the OS viewer (AR Quick Look).
    QuickLook,
    /// In-page 3D without AR.
    Inline,
}

const IOS_DEVICES: [&str; 3] = ["iphone", "ipad", "ipod"];

#[inline]
pub fn is_ios(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    IOS_DEVICES.iter().any(|d| ua.contains(d))
}

pub fn choose_mode(ar_supported: bool, user_agent: &str) -> ViewerMode {
    if ar_supported {
        ViewerMode::ImmersiveAr
    } else if is_ios(user_agent) {
        ViewerMode::QuickLook
    } else {
        ViewerMode::Inline
    }
}
