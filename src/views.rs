//! Server-rendered pages.
//!
//! Every value that reaches the markup goes through [`escape`].

use std::fmt::Write;

use axum::{
    http::{header::SET_COOKIE, HeaderValue},
    response::{Html, IntoResponse, Response},
};

use crate::{
    auth::{CurrentUser, SignupForm},
    cookie,
    entity::{car_make, car_model, user},
    flash::{self, Flash, Flashes, Level},
    model::{Dealer, ReviewRecord},
    review::ReviewForm,
};

/// States offered by the home page filter.
pub const STATES: [&str; 5] = ["New York", "Texas", "Kansas", "California", "Florida"];

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Per-request data shared by every page: who is signed in and which
/// messages to show.
pub struct PageContext {
    pub user: Option<user::Model>,
    pub messages: Vec<Flash>,
    consumed_flash: bool,
}

impl PageContext {
    pub fn new(user: CurrentUser, flashes: Flashes) -> PageContext {
        PageContext {
            user: user.0,
            consumed_flash: !flashes.0.is_empty(),
            messages: flashes.0,
        }
    }

    pub fn with(mut self, flash: Flash) -> PageContext {
        self.messages.push(flash);
        self
    }

    /// Wraps `body` in the site layout. Clears the flash cookie once its
    /// messages have been shown.
    pub fn render(self, title: &str, body: &str) -> Response {
        let mut response = Html(self.layout(title, body)).into_response();
        if self.consumed_flash {
            if let Ok(clear) = HeaderValue::from_str(&cookie::clear(flash::COOKIE_NAME)) {
                response.headers_mut().append(SET_COOKIE, clear);
            }
        }
        response
    }

    fn layout(&self, title: &str, body: &str) -> String {
        let account = match &self.user {
            Some(user) => format!(
                r#"<span>Signed in as {}</span> <a href="/logout/">Log out</a>"#,
                escape(user.display_name())
            ),
            None => r#"<a href="/login/">Log in</a> <a href="/signup/">Sign up</a>"#.to_string(),
        };

        let mut messages = String::new();
        for message in &self.messages {
            let class = match message.level {
                Level::Success => "success",
                Level::Error => "error",
            };
            let _ = write!(
                messages,
                r#"<p class="message {}">{}</p>"#,
                class,
                escape(&message.message)
            );
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} | Dealership Reviews</title></head>
<body>
<nav><a href="/">Dealerships</a> <a href="/about/">About</a> <a href="/contact/">Contact</a> {account}</nav>
{messages}
<main>
{body}
</main>
</body>
</html>
"#,
            title = escape(title),
            account = account,
            messages = messages,
            body = body,
        )
    }
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|error| format!("<li>{}</li>", escape(error)))
        .collect();
    format!(r#"<ul class="errors">{}</ul>"#, items)
}

pub fn index(ctx: PageContext, dealers: &[Dealer], selected_state: &str) -> Response {
    let mut options = String::from(r#"<option value="">All states</option>"#);
    for state in STATES {
        let selected = if state == selected_state { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape(state),
            selected
        );
    }

    let mut rows = String::new();
    for dealer in dealers {
        let _ = write!(
            rows,
            r#"<tr><td>{id}</td><td><a href="/dealer/{id}/">{name}</a></td><td>{city}</td><td>{address}</td><td>{zip}</td><td>{state}</td></tr>"#,
            id = escape(&dealer.field("id")),
            name = escape(&dealer.field("full_name")),
            city = escape(&dealer.field("city")),
            address = escape(&dealer.field("address")),
            zip = escape(&dealer.field("zip")),
            state = escape(&dealer.field("state")),
        );
    }
    if dealers.is_empty() {
        rows.push_str(r#"<tr><td colspan="6">No dealerships found.</td></tr>"#);
    }

    let body = format!(
        r#"<h1>Dealerships</h1>
<form method="get" action="/"><select name="state">{}</select> <button type="submit">Filter</button></form>
<table>
<thead><tr><th>ID</th><th>Dealer</th><th>City</th><th>Address</th><th>Zip</th><th>State</th></tr></thead>
<tbody>{}</tbody>
</table>"#,
        options, rows
    );
    ctx.render("Dealerships", &body)
}

pub fn about(ctx: PageContext) -> Response {
    ctx.render(
        "About",
        "<h1>About Us</h1>\n<p>We help car buyers find trustworthy dealerships through honest reviews from fellow customers.</p>",
    )
}

pub fn contact(ctx: PageContext) -> Response {
    ctx.render(
        "Contact",
        "<h1>Contact Us</h1>\n<p>Email: support@dealership-reviews.example</p>\n<p>Phone: (555) 010-0100</p>",
    )
}

pub fn login(ctx: PageContext, username: &str, next: Option<&str>) -> Response {
    let next = next
        .map(|next| format!(r#"<input type="hidden" name="next" value="{}">"#, escape(next)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="/login/">
{}
<label>Username <input name="username" value="{}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup/">Sign up</a></p>"#,
        next,
        escape(username)
    );
    ctx.render("Log in", &body)
}

pub fn signup(ctx: PageContext, form: &SignupForm, errors: &[String]) -> Response {
    let body = format!(
        r#"<h1>Sign up</h1>
{}
<form method="post" action="/signup/">
<label>Username <input name="username" value="{}" required></label>
<label>First name <input name="first_name" value="{}" required></label>
<label>Last name <input name="last_name" value="{}" required></label>
<label>Email <input type="email" name="email" value="{}" required></label>
<label>Password <input type="password" name="password1" required></label>
<label>Password confirmation <input type="password" name="password2" required></label>
<button type="submit">Create account</button>
</form>"#,
        error_list(errors),
        escape(&form.username),
        escape(&form.first_name),
        escape(&form.last_name),
        escape(&form.email),
    );
    ctx.render("Sign up", &body)
}

pub fn dealer_details(ctx: PageContext, dealer: &Dealer, reviews: &[ReviewRecord]) -> Response {
    let id = escape(&dealer.field("id"));
    let full_name = dealer.field("full_name");
    let mut cards = String::new();
    for review in reviews {
        let purchase = if review.purchased() {
            format!(
                "Purchased a {} {} {} on {}",
                escape(&review.field("car_year")),
                escape(&review.field("car_make")),
                escape(&review.field("car_model")),
                escape(&review.field("purchase_date"))
            )
        } else {
            "Did not purchase".to_string()
        };
        let _ = write!(
            cards,
            r#"<article class="review {sentiment}"><h3>{name}</h3><p>{text}</p><p>{purchase}</p><p>Sentiment: {sentiment}</p></article>"#,
            sentiment = review.sentiment().as_str(),
            name = escape(&review.field("name")),
            text = escape(&review.field("review")),
            purchase = purchase,
        );
    }
    if reviews.is_empty() {
        cards.push_str("<p>No reviews yet.</p>");
    }

    let add_review = if ctx.user.is_some() {
        format!(r#"<a href="/dealer/{}/add_review/">Write a review</a>"#, id)
    } else {
        format!(
            r#"<a href="/login/?next=/dealer/{}/add_review/">Log in to write a review</a>"#,
            id
        )
    };

    let body = format!(
        r#"<h1>{}</h1>
<p>{}, {}, {} {} ({})</p>
{}
<section class="reviews">{}</section>"#,
        escape(&full_name),
        escape(&dealer.field("address")),
        escape(&dealer.field("city")),
        escape(&dealer.field("st")),
        escape(&dealer.field("zip")),
        escape(&dealer.field("state")),
        add_review,
        cards
    );
    ctx.render(&full_name, &body)
}

pub fn add_review(
    ctx: PageContext,
    dealer: &Dealer,
    form: &ReviewForm,
    errors: &[String],
    makes: &[car_make::Model],
    models: &[(car_model::Model, car_make::Model)],
) -> Response {
    let mut make_options = String::new();
    for make in makes {
        let selected = if make.name == form.car_make { " selected" } else { "" };
        let _ = write!(
            make_options,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape(&make.name),
            selected
        );
    }
    let mut model_options = String::new();
    for (model, make) in models {
        let selected = if model.name == form.car_model { " selected" } else { "" };
        let _ = write!(
            model_options,
            r#"<option value="{0}"{1}>{2} {0} ({3}, {4})</option>"#,
            escape(&model.name),
            selected,
            escape(&make.name),
            model.body_type.label(),
            model.year
        );
    }
    let checked = if form.purchase.is_some() { " checked" } else { "" };

    let body = format!(
        r#"<h1>Review {name}</h1>
{errors}
<form method="post" action="/dealer/{id}/add_review/">
<label>Your name <input name="name" value="{reviewer}" maxlength="100" required></label>
<label>Review <textarea name="review" rows="4" required>{review}</textarea></label>
<label><input type="checkbox" name="purchase"{checked}> I purchased a car here</label>
<label>Purchase date <input type="date" name="purchase_date" value="{date}" required></label>
<label>Car make <select name="car_make">{makes}</select></label>
<label>Car model <select name="car_model">{models}</select></label>
<label>Car year <input type="number" name="car_year" value="{year}" required></label>
<button type="submit">Submit review</button>
</form>"#,
        name = escape(&dealer.field("full_name")),
        errors = error_list(errors),
        id = escape(&dealer.field("id")),
        reviewer = escape(&form.name),
        review = escape(&form.review),
        checked = checked,
        date = escape(&form.purchase_date),
        makes = make_options,
        models = model_options,
        year = escape(&form.car_year),
    );
    ctx.render("Add review", &body)
}

pub fn sentiment_test(ctx: PageContext) -> Response {
    ctx.render(
        "Sentiment analyzer",
        r#"<h1>Sentiment analyzer</h1>
<p>POST JSON such as <code>{"text": "Great service!"}</code> to this URL.</p>
<textarea id="text" rows="4"></textarea>
<button onclick="fetch('/api/sentiment/', {method: 'POST', headers: {'Content-Type': 'application/json'}, body: JSON.stringify({text: document.getElementById('text').value})}).then(r => r.json()).then(j => document.getElementById('result').textContent = j.sentiment)">Analyze</button>
<p id="result"></p>"#,
    )
}
