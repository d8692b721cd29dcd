//! Server-rendered HTML pages.

use std::fmt::Write;

use crate::database::models::Note;

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn login_page(error: bool, logged_out: bool) -> String {
    let mut body = String::from("<h1>Please sign in</h1>\n");
    if error {
        body.push_str("<p class=\"error\">Bad credentials</p>\n");
    }
    if logged_out {
        body.push_str("<p class=\"info\">You have been signed out</p>\n");
    }
    body.push_str(
        "<form method=\"post\" action=\"/login\">\n\
         <label>Username <input type=\"text\" name=\"username\" required autofocus></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>",
    );
    layout("Please sign in", &body)
}

pub fn note_list(notes: &[Note], username: &str) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<header>Signed in as <strong>{}</strong> \
         <form method=\"post\" action=\"/logout\" style=\"display:inline\">\
         <button type=\"submit\">Sign out</button></form></header>\n",
        escape_html(username)
    );

    body.push_str("<h1>Notes</h1>\n");
    if notes.is_empty() {
        body.push_str("<p>No notes yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Id</th><th>Title</th><th>Content</th><th></th></tr>\n");
        for note in notes {
            let title = escape_html(note.title.as_deref().unwrap_or_default());
            let content = escape_html(note.content.as_deref().unwrap_or_default());
            let _ = write!(
                body,
                "<tr>\
                 <td>{id}</td>\
                 <td colspan=\"2\"><form method=\"post\" action=\"/note/edit\">\
                 <input type=\"hidden\" name=\"id\" value=\"{id}\">\
                 <input type=\"text\" name=\"title\" value=\"{title}\">\
                 <textarea name=\"content\">{content}</textarea>\
                 <button type=\"submit\">Save</button></form></td>\
                 <td><form method=\"post\" action=\"/note/delete\">\
                 <input type=\"hidden\" name=\"id\" value=\"{id}\">\
                 <button type=\"submit\">Delete</button></form></td>\
                 </tr>\n",
                id = note.id,
                title = title,
                content = content,
            );
        }
        body.push_str("</table>\n");
    }

    body.push_str(
        "<h2>New note</h2>\n\
         <form method=\"post\" action=\"/note/add\">\n\
         <input type=\"text\" name=\"title\" placeholder=\"Title\">\n\
         <textarea name=\"content\" placeholder=\"Content\"></textarea>\n\
         <button type=\"submit\">Add</button>\n\
         </form>",
    );

    layout("Notes", &body)
}

pub fn test_page(message: &str) -> String {
    layout("Test", &format!("<p>{}</p>", escape_html(message)))
}
