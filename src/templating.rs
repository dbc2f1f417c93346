//! Email template rendering.
//!
//! Templates use `{{ name }}` placeholders. Values are HTML-escaped in bodies
//! and inserted verbatim in subjects. Unknown placeholders render empty.

use crate::models::EmailStyle;
use std::collections::HashMap;

pub type TemplateVars = HashMap<String, String>;

pub const WAITLIST_VERIFICATION: &str = "waitlist-verification";
pub const WAITLIST_WELCOME: &str = "waitlist-welcome";
pub const QUOTE_NOTIFICATION: &str = "quote-notification";

/// Template shipped with the binary, used when no stored template of the same
/// name exists.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTemplate {
    pub name: &'static str,
    pub subject: &'static str,
    pub html: &'static str,
    pub sample_vars: &'static [(&'static str, &'static str)],
}

pub const BUILTIN_TEMPLATES: &[BuiltinTemplate] = &[
    BuiltinTemplate {
        name: WAITLIST_VERIFICATION,
        subject: "Your Greenkeep verification code: {{code}}",
        html: r#"<h1 style="margin-top:0">Confirm your spot</h1>
<p>Thanks for joining the Greenkeep waitlist for <strong>{{zipCode}}</strong>.</p>
<p>Your verification code is:</p>
<p class="code">{{code}}</p>
<p>This code expires in {{expiresInSeconds}} seconds. If you didn't request it, you can ignore this email.</p>"#,
        sample_vars: &[("code", "482913"), ("zipCode", "78701"), ("expiresInSeconds", "90")],
    },
    BuiltinTemplate {
        name: WAITLIST_WELCOME,
        subject: "You're on the Greenkeep waitlist",
        html: r#"<h1 style="margin-top:0">You're on the list!</h1>
<p>We'll let you know as soon as Greenkeep starts service in <strong>{{zipCode}}</strong>.</p>
<p>In the meantime, check out our <a class="button" href="{{siteUrl}}/blog">lawn care tips</a>.</p>"#,
        sample_vars: &[("zipCode", "78701"), ("siteUrl", "https://greenkeep.local")],
    },
    BuiltinTemplate {
        name: QUOTE_NOTIFICATION,
        subject: "New quote request from {{name}}",
        html: r#"<h1 style="margin-top:0">New quote request</h1>
<p><strong>{{name}}</strong> ({{email}}, {{phone}}) asked for <strong>{{service}}</strong> in {{zipCode}}.</p>
<p>Lawn size: {{lawnSize}} sq ft. Estimate: {{estimate}}</p>
<p>{{message}}</p>"#,
        sample_vars: &[
            ("name", "Jane Doe"),
            ("email", "jane@example.com"),
            ("phone", "512-555-0100"),
            ("service", "Weekly Mowing"),
            ("zipCode", "78701"),
            ("lawnSize", "6000"),
            ("estimate", "$55.00"),
            ("message", "Corner lot with a side yard."),
        ],
    },
];

/// Look up a built-in template by name
pub fn builtin(name: &str) -> Option<&'static BuiltinTemplate> {
    BUILTIN_TEMPLATES.iter().find(|t| t.name == name)
}

/// Escape text for inclusion in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn substitute(template: &str, vars: &TemplateVars, escape: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                if let Some(value) = vars.get(key) {
                    if escape {
                        out.push_str(&escape_html(value));
                    } else {
                        out.push_str(value);
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                // Unterminated placeholder, keep the text as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Substitute variables into a subject line
pub fn render_subject(subject: &str, vars: &TemplateVars) -> String {
    substitute(subject, vars, false)
}

/// Substitute variables into a body and wrap it in the styled layout
pub fn render_html(body: &str, style: &EmailStyle, vars: &TemplateVars) -> String {
    let content = substitute(body, vars, true);
    let font = escape_html(&style.font_family);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
  a {{ color: {accent}; }}
  a.button {{ display: inline-block; padding: 10px 18px; border-radius: 4px; background: {accent}; color: #ffffff; text-decoration: none; }}
  .code {{ font-size: 28px; font-weight: bold; letter-spacing: 6px; color: {accent}; }}
</style>
</head>
<body style="margin:0;padding:0;background-color:{background};">
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:{background};">
<tr><td align="center" style="padding:24px 12px;">
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="max-width:{max_width}px;background-color:{content_bg};color:{text};font-family:{font};">
<tr><td style="padding:32px;">
{content}
</td></tr>
</table>
</td></tr>
</table>
</body>
</html>"#,
        accent = css_value(&style.accent_color),
        background = css_value(&style.background_color),
        content_bg = css_value(&style.content_background_color),
        text = css_value(&style.text_color),
        max_width = style.max_width.clamp(320, 1200),
        font = font,
        content = content,
    )
}

/// Keep only characters that are safe inside an inline CSS value
fn css_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | ' ' | '%'))
        .collect()
}

/// Sample values for a built-in template, overridden by `overrides`
pub fn merged_vars(name: &str, overrides: &TemplateVars) -> TemplateVars {
    let mut vars: TemplateVars = builtin(name)
        .map(|t| {
            t.sample_vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();
    vars.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_substitution_tolerates_whitespace() {
        let out = render_subject("Hi {{name}}, code {{ code }}", &vars(&[("name", "Jane"), ("code", "123")]));
        assert_eq!(out, "Hi Jane, code 123");
    }

    #[test]
    fn test_unknown_placeholder_renders_empty() {
        assert_eq!(render_subject("a{{missing}}b", &TemplateVars::new()), "ab");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        assert_eq!(render_subject("a {{oops", &TemplateVars::new()), "a {{oops");
    }

    #[test]
    fn test_body_values_are_escaped() {
        let html = render_html(
            "<p>{{name}}</p>",
            &EmailStyle::default(),
            &vars(&[("name", "<script>alert('x')</script>")]),
        );
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_subject_values_not_escaped() {
        assert_eq!(render_subject("{{name}}", &vars(&[("name", "Tom & Jerry")])), "Tom & Jerry");
    }

    #[test]
    fn test_layout_applies_style() {
        let style = EmailStyle {
            accent_color: "#123456".to_string(),
            max_width: 480,
            ..EmailStyle::default()
        };
        let html = render_html("<p>Hello</p>", &style, &TemplateVars::new());
        assert!(html.contains("#123456"));
        assert!(html.contains("max-width:480px"));
        assert!(html.contains("<p>Hello</p>"));
    }

    #[test]
    fn test_css_values_are_sanitized() {
        let style = EmailStyle {
            background_color: "red;}</style><script>".to_string(),
            ..EmailStyle::default()
        };
        let html = render_html("", &style, &TemplateVars::new());
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_builtins_and_merged_vars() {
        let tpl = builtin(WAITLIST_VERIFICATION).unwrap();
        assert!(tpl.html.contains("{{code}}"));
        assert!(builtin("nope").is_none());

        let merged = merged_vars(WAITLIST_VERIFICATION, &vars(&[("code", "000111")]));
        assert_eq!(merged["code"], "000111");
        assert_eq!(merged["zipCode"], "78701");
    }
}
