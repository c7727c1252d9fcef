//! Turning a [`Payload`] into bytes for a client.
//!
//! Two formats are supported: a minimal HTML page and an RSS 2.0 channel.
//! Both keep the payload's order untouched.

use std::fmt::Write as _;

use thiserror::Error;

use crate::pipeline::Payload;
use crate::source::Story;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to format page")]
    Format(#[from] std::fmt::Error),
    #[error("failed to write rss channel")]
    Rss(#[from] rss::Error),
    #[error("rss channel is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const PAGE_TITLE: &str = "Quiet Hacker News";
const SITE_URL: &str = "https://news.ycombinator.com/";

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;color:#222}\
li{margin:.5rem 0}.host,.meta{color:#828282;font-size:.85rem}\
a{color:#222;text-decoration:none}footer{color:#828282;font-size:.8rem;margin-top:2rem}";

pub fn html_page(payload: &Payload) -> Result<String, RenderError> {
    let mut out = String::with_capacity(256 + payload.stories.len() * 256);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{PAGE_TITLE}</title>")?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{PAGE_TITLE}</h1>")?;
    writeln!(out, "<ol>")?;
    for story in &payload.stories {
        write_story(&mut out, story)?;
    }
    writeln!(out, "</ol>")?;
    writeln!(
        out,
        "<footer>This page was rendered in {}</footer>",
        format_elapsed(payload)
    )?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;

    Ok(out)
}

fn write_story(out: &mut String, story: &Story) -> std::fmt::Result {
    let item = &story.item;
    let link = safe_href(item.url.as_deref().unwrap_or_default());

    write!(
        out,
        "<li><a href=\"{}\">{}</a>",
        escape_html(&link),
        escape_html(&item.title)
    )?;
    if !story.host.is_empty() {
        write!(out, " <span class=\"host\">({})</span>", escape_html(&story.host))?;
    }
    writeln!(
        out,
        "<br><span class=\"meta\">{} points by {} | <a href=\"{}\">{} comments</a></span></li>",
        item.score,
        escape_html(&item.by),
        story.comments_url(),
        item.descendants
    )
}

/// `link` if it is an absolute `http`/`https` URL, `#` otherwise.
///
/// Keeps `javascript:` and similar schemes out of `href` attributes.
pub fn safe_href(link: &str) -> String {
    match reqwest::Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => link.to_owned(),
        _ => "#".to_owned(),
    }
}

/// `{:.2?}` style, e.g. `412.37ms` or `1.20s`.
pub fn format_elapsed(payload: &Payload) -> String {
    format!("{:.2?}", payload.elapsed)
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// RSS
// ---------------------------------------------------------------------------

pub fn rss_channel(payload: &Payload, source_name: &str) -> Result<String, RenderError> {
    let items: Vec<rss::Item> = payload.stories.iter().map(rss_item).collect();

    let mut channel = rss::Channel::default();
    channel.set_title(PAGE_TITLE);
    channel.set_link(SITE_URL);
    channel.set_description(format!(
        "Top link stories from {source_name}, rendered in {}",
        format_elapsed(payload)
    ));
    channel.set_items(items);

    let bytes = channel.write_to(Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}

fn rss_item(story: &Story) -> rss::Item {
    let item = &story.item;

    let mut guid = rss::Guid::default();
    guid.set_value(item.id.to_string());
    guid.set_permalink(false);

    let mut entry = rss::Item::default();
    entry.set_title(item.title.clone());
    entry.set_link(item.url.clone());
    entry.set_guid(guid);
    entry.set_comments(story.comments_url());
    entry.set_pub_date(item.time.map(|t| t.to_rfc2822()));
    if !story.host.is_empty() {
        entry.set_description(format!("{} points by {} ({})", item.score, item.by, story.host));
    }
    entry
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
