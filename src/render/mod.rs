// Render module - turns stream events into drawing instructions
//
// The renderer reads status and notification documents through path lookups
// and emits a `RenderPass` per event. It never fails: missing fields drop
// their decoration, and a document with nothing usable still renders an
// (empty) author line.
//
// Layout of one status:
//
//   [🔃 Reblog by handle (name)]            <- only for reblogs
//   handle (name) [badge]     01/15/24(Mon) 18:30:05
//   content line(s)
//   [🔗url]...
//                                 via App Name
//   <blank>

pub mod content;
pub mod segment;
pub mod timestamp;

use crate::config::DisplayOptions;
use crate::document::{lookup, str_at};
use crate::stream::StreamEvent;
use crate::visibility::Visibility;
use crate::width::str_width;
use serde_json::Value;

pub use segment::{RenderOp, RenderPass, StyleTag};
pub use timestamp::Zone;

/// A reblog may wrap a status, never another reblog
const MAX_REBLOG_DEPTH: usize = 1;

/// Converts documents into render passes for a given terminal width
#[derive(Debug, Clone)]
pub struct Renderer {
    display: DisplayOptions,
    width: usize,
    zone: Zone,
}

impl Renderer {
    pub fn new(display: DisplayOptions, width: usize) -> Self {
        Self {
            display,
            width,
            zone: Zone::Local,
        }
    }

    /// Use a fixed time zone instead of the system's local one
    #[cfg(test)]
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Render one classified stream event. Unknown kinds render nothing.
    pub fn dispatch(&self, event: &StreamEvent) -> Option<RenderPass> {
        match event {
            StreamEvent::Status(doc) => self.status(doc),
            StreamEvent::Notification(doc) => self.notification(doc),
            StreamEvent::Unknown { kind } => {
                tracing::trace!("No renderer for '{}' events", kind);
                None
            }
        }
    }

    /// Render a batch timeline, oldest first.
    ///
    /// The API returns newest first, so elements are rendered in reverse
    /// array order. Anything other than an array renders nothing.
    pub fn timeline(&self, doc: &Value) -> Vec<RenderPass> {
        let Some(items) = doc.as_array() else {
            tracing::warn!("Timeline response is not an array, skipping");
            return Vec::new();
        };

        items.iter().rev().filter_map(|item| self.status(item)).collect()
    }

    /// Render a status. Returns `None` when the visibility filter hides it.
    pub fn status(&self, doc: &Value) -> Option<RenderPass> {
        let mut pass = RenderPass::new(self.width);
        if !self.write_status(&mut pass, doc, 0) {
            return None;
        }
        pass.restore_focus();
        Some(pass)
    }

    /// Render a notification, including the status it refers to (if any)
    pub fn notification(&self, doc: &Value) -> Option<RenderPass> {
        let kind = str_at(doc, "type");
        let handle = str_at(doc, "account/acct");
        let display_name = str_at(doc, "account/display_name");
        let status = lookup(doc, "status");

        let mut pass = RenderPass::new(self.width);
        pass.bell();

        if self.display.icons {
            if let Some(icon) = notification_icon(kind) {
                pass.text(icon, StyleTag::Notice);
            }
        }
        pass.text(&capitalize(kind), StyleTag::Notice);
        pass.text(" from ", StyleTag::Notice);
        pass.text(handle, StyleTag::Notice);
        if !display_name.is_empty() {
            pass.text(&format!(" ({})", display_name), StyleTag::Notice);
        }
        pass.newline();

        // Follow notifications carry `"status": null`
        if status.is_present() {
            self.write_status(&mut pass, status.node, 0);
        }

        pass.newline();
        pass.restore_focus();
        Some(pass)
    }

    /// Append one status to `pass`. Returns false if nothing was written
    /// because the visibility filter rejected the status.
    fn write_status(&self, pass: &mut RenderPass, doc: &Value, depth: usize) -> bool {
        let handle = str_at(doc, "account/acct");
        let display_name = str_at(doc, "account/display_name");
        let reblog = lookup(doc, "reblog");
        let visibility = lookup(doc, "visibility")
            .as_str()
            .map(Visibility::parse)
            .unwrap_or_default();

        if !self.display.show_sensitive && visibility.is_sensitive() {
            tracing::debug!("Hiding {} status from {}", visibility.as_str(), handle);
            return false;
        }

        if reblog.is_present() {
            if depth < MAX_REBLOG_DEPTH {
                if self.display.icons {
                    pass.text("🔃 ", StyleTag::Banner);
                }
                pass.text("Reblog by ", StyleTag::Banner);
                pass.text(handle, StyleTag::Banner);
                if !display_name.is_empty() {
                    pass.text(&format!(" ({})", display_name), StyleTag::Banner);
                }
                pass.newline();

                // The wrapper's own content is never shown
                self.write_status(pass, reblog.node, depth + 1);
                return true;
            }
            tracing::warn!("Nested reblog from {} ignored", handle);
        }

        // Author line
        pass.text(handle, StyleTag::Author);
        if !display_name.is_empty() {
            pass.text(&format!(" ({})", display_name), StyleTag::DisplayName);
        }
        if let Some(badge) = visibility.badge(self.display.icons) {
            pass.text(" ", StyleTag::VisibilityBadge);
            pass.text(badge, StyleTag::VisibilityBadge);
        }
        self.write_timestamp(pass, doc);
        pass.newline();

        pass.text(&content::sanitize(str_at(doc, "content")), StyleTag::Default);
        pass.newline();

        self.write_media(pass, doc);
        self.write_application(pass, doc);

        pass.newline();
        true
    }

    /// Right-align the timestamp on the author line.
    ///
    /// The stamp ends one column short of the right edge so the row never
    /// wraps. When the author line is already too long, the cursor backs up
    /// over it and the stamp overwrites its tail.
    fn write_timestamp(&self, pass: &mut RenderPass, doc: &Value) {
        let Some(created) = lookup(doc, "created_at")
            .as_str()
            .and_then(timestamp::parse_created_at)
        else {
            return;
        };

        let stamp = self.zone.format(created);
        let stamp_w = str_width(&stamp) + 1;
        let x = pass.column();
        let limit = self.width.saturating_sub(stamp_w);

        if x < limit {
            pass.pad(limit - x);
        } else {
            pass.erase_back(x - limit + 1);
            pass.text(" ", StyleTag::Default);
        }
        pass.text(&stamp, StyleTag::Timestamp);
    }

    fn write_media(&self, pass: &mut RenderPass, doc: &Value) {
        let Some(items) = lookup(doc, "media_attachments")
            .get()
            .and_then(Value::as_array)
        else {
            return;
        };

        for item in items {
            if let Some(url) = lookup(item, "url").as_str() {
                pass.text(self.display.link_marker(), StyleTag::Link);
                pass.text(url, StyleTag::Link);
                pass.newline();
            }
        }
    }

    fn write_application(&self, pass: &mut RenderPass, doc: &Value) {
        let name = lookup(doc, "application/name");
        if !name.is_present() {
            return;
        }
        let name = name.as_str().unwrap_or_default();

        // "via " plus one spare column at the right edge
        pass.pad(self.width.saturating_sub(str_width(name) + 4 + 1));
        pass.text("via ", StyleTag::Author);
        pass.text(name, StyleTag::AppName);
        pass.newline();
    }
}

fn notification_icon(kind: &str) -> Option<&'static str> {
    match kind {
        "follow" => Some("👥"),
        "favourite" => Some("💕"),
        "reblog" => Some("🔃"),
        "mention" => Some("🗨"),
        _ => None,
    }
}

/// Uppercase the first character: "favourite" -> "Favourite"
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    const WIDTH: usize = 60;

    fn renderer_with_width(display: DisplayOptions, width: usize) -> Renderer {
        let utc = FixedOffset::east_opt(0).unwrap();
        Renderer::new(display, width).with_zone(Zone::Fixed(utc))
    }

    fn renderer(display: DisplayOptions) -> Renderer {
        renderer_with_width(display, WIDTH)
    }

    fn plain() -> Renderer {
        renderer(DisplayOptions::default())
    }

    fn status(visibility: &str) -> Value {
        json!({
            "id": "1",
            "created_at": "2024-01-15T09:30:05.000Z",
            "visibility": visibility,
            "content": "<p>Hello &amp; welcome</p><p>second</p>",
            "account": {"acct": "alice@example.social", "display_name": "Alice"},
            "reblog": null,
            "media_attachments": [
                {"url": "https://files.example/1.png"},
                {"url": null}
            ],
            "application": {"name": "Web"}
        })
    }

    fn text_ops(pass: &RenderPass, style: StyleTag) -> Vec<String> {
        pass.ops()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Text { text, style: s } if *s == style => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn status_layout() {
        let pass = plain().status(&status("public")).unwrap();
        let text = pass.plain_text();
        let lines: Vec<&str> = text.split('\n').collect();

        assert!(lines[0].starts_with("alice@example.social (Alice)"));
        assert!(lines[0].ends_with("01/15/24(Mon) 09:30:05"));
        assert_eq!(str_width(lines[0]), WIDTH - 1);
        assert_eq!(lines[1], "Hello & welcome");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "second");
        assert_eq!(lines[4], "🔗https://files.example/1.png");
        assert!(lines[5].ends_with("via Web"));
        assert_eq!(str_width(lines[5]), WIDTH - 1);
        assert_eq!(lines[6], "");
        assert_eq!(pass.ops().last(), Some(&RenderOp::RestoreFocus));
    }

    #[test]
    fn author_styles() {
        let pass = plain().status(&status("public")).unwrap();
        assert_eq!(text_ops(&pass, StyleTag::Author), vec!["alice@example.social", "via "]);
        assert_eq!(text_ops(&pass, StyleTag::DisplayName), vec![" (Alice)"]);
        assert_eq!(text_ops(&pass, StyleTag::AppName), vec!["Web"]);
        assert_eq!(
            text_ops(&pass, StyleTag::Timestamp),
            vec!["01/15/24(Mon) 09:30:05"]
        );
        assert!(text_ops(&pass, StyleTag::VisibilityBadge).is_empty());
    }

    #[test]
    fn rendering_is_idempotent() {
        let r = plain();
        let doc = status("unlisted");
        assert_eq!(r.status(&doc), r.status(&doc));
    }

    #[test]
    fn empty_display_name_has_no_parentheses() {
        let mut doc = status("public");
        doc["account"]["display_name"] = json!("");
        let text = plain().status(&doc).unwrap().plain_text();
        assert!(text.starts_with("alice@example.social "));
        assert!(!text.contains("()"));
    }

    #[test]
    fn hidden_when_sensitive_and_filter_on() {
        let r = plain();
        assert!(r.status(&status("direct")).is_none());
        assert!(r.status(&status("private")).is_none());
        assert!(r.status(&status("unlisted")).is_some());
    }

    #[test]
    fn unlocked_direct_matches_public_except_badge() {
        let r = renderer(DisplayOptions {
            show_sensitive: true,
            ..DisplayOptions::default()
        });
        let direct = r.status(&status("direct")).unwrap();
        let public = r.status(&status("public")).unwrap();

        assert_eq!(text_ops(&direct, StyleTag::VisibilityBadge), vec![" ", "✉"]);

        let direct_text = direct.plain_text();
        let public_text = public.plain_text();
        let (d_head, d_body) = direct_text.split_once('\n').unwrap();
        let (p_head, p_body) = public_text.split_once('\n').unwrap();
        assert_eq!(d_body, p_body);
        assert!(d_head.contains(" ✉"));
        assert_eq!(
            d_head.replace(" ✉", "").split_whitespace().collect::<Vec<_>>(),
            p_head.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn plain_text_badges_without_icons() {
        let display = DisplayOptions {
            show_sensitive: true,
            icons: false,
            ..DisplayOptions::default()
        };
        let r = renderer_with_width(display, 80);
        let text = r.status(&status("private")).unwrap().plain_text();
        assert!(text.contains("(Alice) <PRIVATE>"));
        assert!(text.contains("<LINK>https://files.example/1.png"));
        let unlisted = r.status(&status("unlisted")).unwrap().plain_text();
        assert!(unlisted.contains("<UNLIST>"));
    }

    #[test]
    fn reblog_renders_banner_and_inner_status_only() {
        let mut inner = status("public");
        inner["account"] = json!({"acct": "bob", "display_name": "Bob"});
        inner["content"] = json!("<p>original post</p>");
        let outer = json!({
            "visibility": "public",
            "created_at": "2024-01-15T10:00:00Z",
            "content": "<p>WRAPPER CONTENT</p>",
            "account": {"acct": "alice", "display_name": "Alice"},
            "reblog": inner,
        });

        let pass = plain().status(&outer).unwrap();
        let text = pass.plain_text();
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines[0], "🔃 Reblog by alice (Alice)");
        assert!(lines[1].starts_with("bob (Bob)"));
        assert_eq!(lines[2], "original post");
        assert!(!text.contains("WRAPPER CONTENT"));
        assert_eq!(text_ops(&pass, StyleTag::Banner).concat(), "🔃 Reblog by alice (Alice)");
        assert_eq!(
            pass.ops().iter().filter(|op| **op == RenderOp::RestoreFocus).count(),
            1
        );
    }

    #[test]
    fn reblog_inner_visibility_is_rechecked() {
        let outer = json!({
            "visibility": "public",
            "account": {"acct": "alice", "display_name": ""},
            "reblog": status("private"),
        });
        let text = plain().status(&outer).unwrap().plain_text();
        assert_eq!(text, "🔃 Reblog by alice\n");
    }

    #[test]
    fn nested_reblog_stops_at_depth_limit() {
        let innermost = status("public");
        let middle = json!({
            "visibility": "public",
            "content": "<p>middle</p>",
            "account": {"acct": "bob", "display_name": ""},
            "reblog": innermost,
        });
        let outer = json!({
            "visibility": "public",
            "account": {"acct": "carol", "display_name": ""},
            "reblog": middle,
        });

        let text = plain().status(&outer).unwrap().plain_text();
        assert_eq!(text.matches("Reblog by").count(), 1);
        assert!(text.contains("middle"));
        assert!(!text.contains("Hello & welcome"));
    }

    #[test]
    fn long_author_line_backs_up_for_timestamp() {
        let r = renderer_with_width(DisplayOptions::default(), 30);
        let mut doc = status("public");
        doc["account"]["display_name"] = json!("A Very Long Display Name");

        // 47 columns wrap to 17 on the second row; the stamp needs column 7
        let pass = r.status(&doc).unwrap();
        assert!(pass.ops().contains(&RenderOp::EraseBack(11)));

        let text = pass.plain_text();
        let first = text.split('\n').next().unwrap();
        assert_eq!(first, "alice@example.social (A Very Long Di 01/15/24(Mon) 09:30:05");
    }

    #[test]
    fn timestamp_stays_flush_when_erase_splits_wide_char() {
        let r = renderer_with_width(DisplayOptions::default(), 30);
        let mut doc = status("public");
        doc["account"] = json!({"acct": "abc", "display_name": "日本語日本語日本語日本語"});

        // "abc (" + 24 wide columns + ")" fills the row; backing up 24 lands
        // on the right half of the first 日
        let pass = r.status(&doc).unwrap();
        assert!(pass.ops().contains(&RenderOp::EraseBack(24)));

        let text = pass.plain_text();
        let first = text.split('\n').next().unwrap();
        assert_eq!(first, "abc (  01/15/24(Mon) 09:30:05");
        assert_eq!(str_width(first), 29);
    }

    #[test]
    fn unknown_visibility_gets_direct_badge_and_is_shown() {
        let display = DisplayOptions {
            icons: false,
            ..DisplayOptions::default()
        };
        let pass = renderer_with_width(display, 80)
            .status(&status("limited"))
            .unwrap();
        assert_eq!(
            text_ops(&pass, StyleTag::VisibilityBadge),
            vec![" ", "<!DIRECT!>"]
        );
    }

    #[test]
    fn missing_fields_do_not_panic() {
        let r = plain();
        let pass = r.status(&json!({})).unwrap();
        assert_eq!(pass.plain_text(), "\n\n\n");

        let pass = r.status(&json!("not an object")).unwrap();
        assert!(pass.plain_text().starts_with('\n'));
    }

    #[test]
    fn null_application_name_is_skipped() {
        let mut doc = status("public");
        doc["application"] = json!({"name": null});
        assert!(!plain().status(&doc).unwrap().plain_text().contains("via"));
        doc["application"] = json!(null);
        assert!(!plain().status(&doc).unwrap().plain_text().contains("via"));
    }

    #[test]
    fn notification_with_status() {
        let doc = json!({
            "type": "favourite",
            "account": {"acct": "bob", "display_name": "Bob"},
            "status": status("public"),
        });
        let pass = plain().notification(&doc).unwrap();

        assert_eq!(pass.ops().first(), Some(&RenderOp::Bell));
        assert_eq!(text_ops(&pass, StyleTag::Notice).concat(), "💕Favourite from bob (Bob)");

        let text = pass.plain_text();
        assert!(text.starts_with("💕Favourite from bob (Bob)\nalice@example.social"));
        assert!(text.ends_with("via Web\n\n\n"));
        assert_eq!(
            pass.ops().iter().filter(|op| **op == RenderOp::RestoreFocus).count(),
            1
        );
    }

    #[test]
    fn follow_notification_has_no_status() {
        let doc = json!({
            "type": "follow",
            "account": {"acct": "carol", "display_name": ""},
            "status": null,
        });
        let r = renderer(DisplayOptions {
            icons: false,
            ..DisplayOptions::default()
        });
        assert_eq!(r.notification(&doc).unwrap().plain_text(), "Follow from carol\n\n");
    }

    #[test]
    fn unknown_notification_type_has_no_icon() {
        let doc = json!({
            "type": "poll",
            "account": {"acct": "dave", "display_name": ""},
        });
        assert_eq!(plain().notification(&doc).unwrap().plain_text(), "Poll from dave\n\n");
    }

    #[test]
    fn notification_status_still_filtered() {
        let doc = json!({
            "type": "mention",
            "account": {"acct": "eve", "display_name": ""},
            "status": status("direct"),
        });
        assert_eq!(plain().notification(&doc).unwrap().plain_text(), "🗨Mention from eve\n\n");
    }

    #[test]
    fn timeline_renders_oldest_first() {
        let docs: Vec<Value> = (0..3)
            .map(|i| {
                let mut s = status("public");
                s["content"] = json!(format!("<p>index{}</p>", i));
                s
            })
            .collect();
        let passes = plain().timeline(&Value::Array(docs));

        let order: Vec<String> = passes
            .iter()
            .map(|p| p.plain_text().split('\n').nth(1).unwrap().to_string())
            .collect();
        assert_eq!(order, vec!["index2", "index1", "index0"]);
    }

    #[test]
    fn timeline_skips_hidden_and_non_arrays() {
        let r = plain();
        let batch = json!([status("public"), status("direct"), status("unlisted")]);
        assert_eq!(r.timeline(&batch).len(), 2);
        assert!(r.timeline(&json!({"error": "nope"})).is_empty());
    }

    #[test]
    fn dispatch_by_event_kind() {
        let r = plain();
        assert!(r.dispatch(&StreamEvent::Status(status("public"))).is_some());
        assert!(r
            .dispatch(&StreamEvent::Unknown {
                kind: "delete".into()
            })
            .is_none());
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("reblog"), "Reblog");
        assert_eq!(capitalize("éa"), "Éa");
    }
}
