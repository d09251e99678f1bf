//! Fixed HTML layout for the stems-ready notification.

use std::collections::BTreeMap;

/// Button style applied to even-positioned links.
const STYLE_PRIMARY: &str = "display:inline-block;margin:6px 0;padding:10px 18px;\
     background-color:#6c5ce7;color:#ffffff;text-decoration:none;border-radius:6px;";

/// Button style applied to odd-positioned links.
const STYLE_SECONDARY: &str = "display:inline-block;margin:6px 0;padding:10px 18px;\
     background-color:#00b894;color:#ffffff;text-decoration:none;border-radius:6px;";

/// Render the notification body for a completed job.
///
/// Emits one anchor per stem, alternating the two button styles by position.
/// Stems arrive as a sorted map, so the rendering is deterministic.
#[must_use]
pub fn render_stems_email(title: &str, stems: &BTreeMap<String, String>) -> String {
    let mut links = String::new();
    for (index, (stem, url)) in stems.iter().enumerate() {
        let style = if index % 2 == 0 {
            STYLE_PRIMARY
        } else {
            STYLE_SECONDARY
        };
        links.push_str(&format!(
            "      <p><a href=\"{url}\" style=\"{style}\">Download {}</a></p>\n",
            escape_html(stem)
        ));
    }

    format!(
        "<html>\n  <body style=\"font-family:Arial,sans-serif;color:#2d3436;\">\n    \
         <h2>Your stems are ready</h2>\n    \
         <p>Separation finished for <strong>{}</strong>.</p>\n    <div>\n{links}    </div>\n    \
         <p style=\"color:#636e72;font-size:12px;\">Sent by Stemgate.</p>\n  </body>\n</html>\n",
        escape_html(title)
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stems() -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                "no_vocals".to_string(),
                "http://host/audio/job/no_vocals.mp3".to_string(),
            ),
            (
                "vocals".to_string(),
                "http://host/audio/job/vocals.mp3".to_string(),
            ),
        ])
    }

    #[test]
    fn renders_one_anchor_per_stem() {
        let html = render_stems_email("Track", &stems());
        assert_eq!(html.matches("<a href=").count(), 2);
        assert!(html.contains("http://host/audio/job/vocals.mp3"));
        assert!(html.contains("<strong>Track</strong>"));
    }

    #[test]
    fn alternates_button_styles_by_position() {
        let html = render_stems_email("Track", &stems());
        let first = html.find("#6c5ce7").expect("primary style");
        let second = html.find("#00b894").expect("secondary style");
        assert!(first < second);
    }

    #[test]
    fn escapes_markup_in_titles() {
        let html = render_stems_email("<script>alert()</script>", &stems());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
