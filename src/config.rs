use window::WindowAttrs;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// client-area size in physical pixels.
    pub width: u32,
    pub height: u32,
    pub log_level: log::LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "ANGLE Bare-bones".to_string(),
            width: 640,
            height: 480,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl AppConfig {
    pub fn window_attrs(&self) -> WindowAttrs {
        WindowAttrs {
            title: self.title.clone(),
            size: (self.width, self.height),
            ..WindowAttrs::default()
        }
    }
}

#[test]
fn test_window_attrs_follow_config() {
    let config = AppConfig::default();
    let attrs = config.window_attrs();
    assert_eq!(attrs.title, "ANGLE Bare-bones");
    assert_eq!(attrs.size, (640, 480));
    assert!(attrs.resizable);
}
