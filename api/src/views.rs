use crate::{
    dto::{HomeUserView, UserView},
    models::Comment,
};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt::Write;

/// A page body plus its title. Rendered inside the shared layout by
/// [`View`].
#[derive(Debug, Clone)]
pub enum Page {
    Home {
        title: String,
        user: HomeUserView,
        message: Option<String>,
    },
    Register {
        error: Option<String>,
    },
    Login {
        error: Option<String>,
        success: Option<String>,
    },
    Comments {
        comments: Vec<Comment>,
        user: UserView,
        message: Option<String>,
    },
    NewComment {
        user: UserView,
        error: Option<String>,
    },
    ServerError,
}

/// What a handler hands to the rendering step: the page, and the identity
/// shown in the navigation bar.
#[derive(Debug, Clone)]
pub struct View {
    pub nav: UserView,
    pub page: Page,
}

impl View {
    pub fn new(nav: UserView, page: Page) -> Self {
        Self { nav, page }
    }

    pub fn status(&self) -> StatusCode {
        match self.page {
            Page::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        }
    }

    pub fn render(&self) -> String {
        let (title, body) = self.page.render();
        let mut html = String::with_capacity(body.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape(&title));
        html.push_str("</head>\n<body>\n");
        html.push_str(&render_nav(&self.nav));
        html.push_str("<main>\n");
        html.push_str(&body);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        (self.status(), Html(self.render())).into_response()
    }
}

impl Page {
    fn render(&self) -> (String, String) {
        let mut body = String::new();
        let title = match self {
            Page::Home {
                title,
                user,
                message,
            } => {
                let _ = writeln!(body, "<h1>{}</h1>", escape(title));
                if let Some(message) = message {
                    let _ = writeln!(body, "<p class=\"message\">{}</p>", escape(message));
                }
                let _ = writeln!(body, "<p>Hello, {}!</p>", escape(&user.name));
                if user.is_logged_in {
                    if let Some(login_time) = user.login_time {
                        let _ = writeln!(
                            body,
                            "<p class=\"login-time\">Logged in at {}</p>",
                            login_time.to_rfc3339()
                        );
                    }
                    let _ = writeln!(
                        body,
                        "<p class=\"visit-count\">Visits this session: {}</p>",
                        user.visit_count
                    );
                } else {
                    body.push_str(
                        "<p><a href=\"/login\">Log in</a> or <a href=\"/register\">register</a> to join the discussion.</p>\n",
                    );
                }
                title.clone()
            }
            Page::Register { error } => {
                body.push_str("<h1>Register</h1>\n");
                push_alert(&mut body, "error", error.as_deref());
                body.push_str(concat!(
                    "<form method=\"post\" action=\"/register\">\n",
                    "<label>Username <input type=\"text\" name=\"username\"></label>\n",
                    "<label>Password <input type=\"password\" name=\"password\"></label>\n",
                    "<button type=\"submit\">Register</button>\n",
                    "</form>\n",
                ));
                "Register".into()
            }
            Page::Login { error, success } => {
                body.push_str("<h1>Login</h1>\n");
                push_alert(&mut body, "error", error.as_deref());
                push_alert(&mut body, "success", success.as_deref());
                body.push_str(concat!(
                    "<form method=\"post\" action=\"/login\">\n",
                    "<label>Username <input type=\"text\" name=\"username\"></label>\n",
                    "<label>Password <input type=\"password\" name=\"password\"></label>\n",
                    "<button type=\"submit\">Log in</button>\n",
                    "</form>\n",
                ));
                "Login".into()
            }
            Page::Comments {
                comments,
                user,
                message,
            } => {
                body.push_str("<h1>Comments</h1>\n");
                push_alert(&mut body, "success", message.as_deref());
                if comments.is_empty() {
                    body.push_str("<p class=\"empty\">No comments yet.</p>\n");
                } else {
                    body.push_str("<ul class=\"comments\">\n");
                    for comment in comments {
                        let _ = writeln!(
                            body,
                            "<li class=\"comment\"><span class=\"author\">{}</span> <time>{}</time><p class=\"text\">{}</p></li>",
                            escape(&comment.author),
                            comment.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                            escape(&comment.text),
                        );
                    }
                    body.push_str("</ul>\n");
                }
                if user.is_logged_in {
                    body.push_str("<p><a href=\"/comment/new\">Write a comment</a></p>\n");
                } else {
                    body.push_str("<p><a href=\"/login\">Log in</a> to post a comment.</p>\n");
                }
                "Comments".into()
            }
            Page::NewComment { user, error } => {
                body.push_str("<h1>New Comment</h1>\n");
                push_alert(&mut body, "error", error.as_deref());
                if user.is_logged_in {
                    let _ = writeln!(body, "<p>Posting as {}</p>", escape(&user.name));
                } else {
                    body.push_str("<p>You are browsing as Guest. <a href=\"/login\">Log in</a> to post.</p>\n");
                }
                body.push_str(concat!(
                    "<form method=\"post\" action=\"/comments\">\n",
                    "<textarea name=\"text\" rows=\"4\"></textarea>\n",
                    "<button type=\"submit\">Post</button>\n",
                    "</form>\n",
                ));
                "New Comment".into()
            }
            Page::ServerError => {
                body.push_str("<h1>Something went wrong</h1>\n<p>Please try again.</p>\n");
                "Error".into()
            }
        };
        (title, body)
    }
}

fn render_nav(user: &UserView) -> String {
    let mut nav = String::from("<nav>\n<a href=\"/\">Home</a>\n<a href=\"/comments\">Comments</a>\n");
    if user.is_logged_in {
        let _ = writeln!(nav, "<span class=\"user\">{}</span>", escape(&user.name));
        nav.push_str("<form method=\"post\" action=\"/logout\"><button type=\"submit\">Logout</button></form>\n");
    } else {
        nav.push_str("<a href=\"/login\">Login</a>\n<a href=\"/register\">Register</a>\n");
    }
    nav.push_str("</nav>\n");
    nav
}

fn push_alert(body: &mut String, class: &str, text: Option<&str>) {
    if let Some(text) = text {
        let _ = writeln!(body, "<p class=\"{class}\">{}</p>", escape(text));
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
