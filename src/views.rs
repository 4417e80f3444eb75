//! String-built HTML pages. Deliberately thin: per-request data (user, flash,
//! filter) is passed in explicitly and everything user-provided is escaped.

use axum::{http::StatusCode, response::Html};

use crate::{
    models::{Snippet, SnippetFilter},
    session::{Flash, FlashKind},
};

/// Escapes text for safe interpolation into HTML body and attribute positions.
fn escape(input: &str) -> String {
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

fn flash_fragment(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => {
            let class = match flash.kind {
                FlashKind::Success => "success",
                FlashKind::Error => "error",
            };
            format!(
                r#"<p class="flash flash-{class}">{}</p>"#,
                escape(&flash.message)
            )
        }
        None => String::new(),
    }
}

fn nav_fragment(user: Option<&str>) -> String {
    match user {
        Some(user) => format!(
            concat!(
                r#"<nav><a href="/">Home</a> <a href="/create">New snippet</a> "#,
                r#"<a href="/filter">Filter</a> "#,
                r#"<span class="whoami">Signed in as {user}</span> "#,
                r#"<form class="logout" method="post" action="/logout">"#,
                r#"<button type="submit">Log out</button></form></nav>"#
            ),
            user = escape(user)
        ),
        None => concat!(
            r#"<nav><a href="/">Home</a> <a href="/filter">Filter</a> "#,
            r#"<a href="/login">Log in</a> <a href="/register">Register</a></nav>"#
        )
        .to_string(),
    }
}

fn layout(title: &str, user: Option<&str>, flash: Option<&Flash>, body: &str) -> Html<String> {
    Html(format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            "<title>{title} - snipbin</title></head>\n",
            "<body>{nav}{flash}\n{body}\n</body></html>"
        ),
        title = escape(title),
        nav = nav_fragment(user),
        flash = flash_fragment(flash),
        body = body
    ))
}

fn filter_notice(filter: Option<&SnippetFilter>) -> String {
    let Some(filter) = filter else {
        return String::new();
    };
    let mut parts = Vec::new();
    if let Some(tag) = &filter.tag {
        parts.push(format!("tag {}", escape(tag)));
    }
    if let Some(owner) = &filter.owner {
        parts.push(format!("owner {}", escape(owner)));
    }
    if parts.is_empty() {
        return String::new();
    }
    format!(
        r#"<p class="active-filter">Filtering by {} (<a href="/filter">change</a>)</p>"#,
        parts.join(" and ")
    )
}

pub fn index_page(
    user: Option<&str>,
    flash: Option<&Flash>,
    filter: Option<&SnippetFilter>,
    snippets: &[Snippet],
) -> Html<String> {
    let mut body = String::from("<h1>Snippets</h1>\n");
    body.push_str(&filter_notice(filter));

    if snippets.is_empty() {
        body.push_str("<p>No snippets yet.</p>\n");
    } else {
        body.push_str("<ul class=\"snippets\">\n");
        for snippet in snippets {
            let tags = snippet
                .tags
                .iter()
                .map(|t| format!(r#"<span class="tag">{}</span>"#, escape(t)))
                .collect::<Vec<_>>()
                .join(" ");
            body.push_str(&format!(
                concat!(
                    "<li><pre><code>{code}</code></pre>",
                    r#"<p class="meta">by {owner} {tags}</p>"#
                ),
                code = escape(&snippet.code),
                owner = escape(&snippet.owner),
                tags = tags
            ));
            // Edit links only for the owner; the guard enforces this server-side anyway.
            if user == Some(snippet.owner.as_str()) {
                body.push_str(&format!(
                    r#" <a href="/{id}/update">update</a> <a href="/{id}/delete">delete</a>"#,
                    id = snippet.id
                ));
            }
            body.push_str("</li>\n");
        }
        body.push_str("</ul>\n");
    }

    layout("Snippets", user, flash, &body)
}

pub fn filter_page(
    user: Option<&str>,
    flash: Option<&Flash>,
    filter: Option<&SnippetFilter>,
) -> Html<String> {
    let current = filter.cloned().unwrap_or_default();
    let body = format!(
        concat!(
            "<h1>Filter snippets</h1>\n",
            r#"<form method="post" action="/filter">"#,
            r#"<label>Tag <input type="text" name="tag" value="{tag}"></label>"#,
            r#"<label>Owner <input type="text" name="owner" value="{owner}"></label>"#,
            r#"<button type="submit">Apply</button></form>"#,
            "<p>Leave both fields blank to clear the filter.</p>"
        ),
        tag = escape(current.tag.as_deref().unwrap_or("")),
        owner = escape(current.owner.as_deref().unwrap_or(""))
    );
    layout("Filter", user, flash, &body)
}

pub fn register_page(flash: Option<&Flash>) -> Html<String> {
    let body = concat!(
        "<h1>Register</h1>\n",
        r#"<form method="post" action="/register">"#,
        r#"<label>Username <input type="text" name="username" maxlength="30"></label>"#,
        r#"<label>Password <input type="password" name="password"></label>"#,
        r#"<button type="submit">Register</button></form>"#
    );
    layout("Register", None, flash, body)
}

pub fn login_page(flash: Option<&Flash>) -> Html<String> {
    let body = concat!(
        "<h1>Log in</h1>\n",
        r#"<form method="post" action="/login">"#,
        r#"<label>Username <input type="text" name="username"></label>"#,
        r#"<label>Password <input type="password" name="password"></label>"#,
        r#"<button type="submit">Log in</button></form>"#
    );
    layout("Log in", None, flash, body)
}

pub fn create_page(user: Option<&str>, flash: Option<&Flash>) -> Html<String> {
    let body = concat!(
        "<h1>New snippet</h1>\n",
        r#"<form method="post" action="/create">"#,
        r#"<label>Code <textarea name="code"></textarea></label>"#,
        r#"<label>Tags <input type="text" name="tags" placeholder="go rust"></label>"#,
        r#"<button type="submit">Create</button></form>"#
    );
    layout("New snippet", user, flash, body)
}

pub fn update_page(user: Option<&str>, flash: Option<&Flash>, snippet: &Snippet) -> Html<String> {
    let body = format!(
        concat!(
            "<h1>Update snippet</h1>\n",
            r#"<form method="post" action="/{id}/update">"#,
            r#"<label>Code <textarea name="code">{code}</textarea></label>"#,
            r#"<label>Tags <input type="text" name="tags" value="{tags}"></label>"#,
            r#"<button type="submit">Update</button></form>"#
        ),
        id = snippet.id,
        code = escape(&snippet.code),
        tags = escape(&snippet.tags.join(" "))
    );
    layout("Update snippet", user, flash, &body)
}

pub fn delete_page(user: Option<&str>, flash: Option<&Flash>, snippet: &Snippet) -> Html<String> {
    let body = format!(
        concat!(
            "<h1>Delete snippet</h1>\n",
            "<pre><code>{code}</code></pre>\n",
            r#"<form method="post" action="/{id}/delete">"#,
            "<p>Really delete this snippet?</p>",
            r#"<button type="submit">Delete</button> <a href="/">Cancel</a></form>"#
        ),
        code = escape(&snippet.code),
        id = snippet.id
    );
    layout("Delete snippet", user, flash, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape(&title), escape(message));
    layout(&title, None, None, &body)
}
