//! Web UI assets compiled into the binary.

pub const INDEX_HTML: &str = include_str!("../../static/index.html");
pub const STYLE_CSS: &str = include_str!("../../static/style.css");
pub const APP_JS: &str = include_str!("../../static/app.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_popups_are_text_nodes() {
        let popups: Vec<&str> = APP_JS.split(".bindPopup(").skip(1).collect();
        assert!(!popups.is_empty());
        for rest in popups {
            assert!(
                rest.starts_with("el("),
                "popup content must be built with el(): {}",
                rest.chars().take(40).collect::<String>()
            );
        }
    }
}
