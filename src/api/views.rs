//! Server-rendered pages.
//!
//! Every piece of stored or user-supplied text goes through
//! [`html_escape`] before it reaches the markup.

use axum::response::Html;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use super::session::SessionUser;
use crate::models::ability::Ability;
use crate::models::community::Comment;
use crate::models::hero::{Hero, HeroDetail, HeroWithAbilities};
use crate::models::user::UserRole;

fn layout(title: &str, user: Option<&SessionUser>, body: &str) -> Html<String> {
    let account = match user {
        Some(u) if u.role == UserRole::Admin => format!(
            r#"<a href="/admin">Admin</a> <span class="user">{}</span> <a href="/logout">Log out</a>"#,
            text(&u.username)
        ),
        Some(u) => format!(
            r#"<span class="user">{}</span> <a href="/logout">Log out</a>"#,
            text(&u.username)
        ),
        None => r#"<a href="/auth">Sign in</a>"#.to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Herodex</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<header><nav><a href="/">Heroes</a> <a href="/feedback">Feedback</a> {account}</nav></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    ))
}

fn hero_href(name: &str) -> String {
    format!("/hero/{}", urlencoding::encode(name))
}

/// Inline style built from the hero's optional colour columns.
fn hero_style(hero: &Hero) -> String {
    let mut style = String::new();
    for (property, value) in [
        ("--background-color", &hero.background_color),
        ("--text-color", &hero.text_color),
        ("--highlight-color", &hero.highlight_color),
        ("--secondary-color", &hero.secondary_color),
    ] {
        if let Some(value) = value {
            let _ = write!(style, "{property}: {value}; ");
        }
    }
    let _ = write!(style, "--background-image: url('{}');", hero.background_image_url);
    style
}

pub fn index(heroes: &[Hero], user: Option<&SessionUser>) -> Html<String> {
    let mut body = String::from("<h1>Heroes</h1>\n<ul class=\"heroes\">\n");

    if heroes.is_empty() {
        body.push_str("<li class=\"empty\">No heroes yet.</li>\n");
    }

    for hero in heroes {
        let _ = writeln!(
            body,
            r#"<li class="hero-card attr-{attribute_class}"><a href="{href}"><img src="{image}" alt="{alt}"><span class="name">{name}</span><span class="attribute">{attribute}</span></a></li>"#,
            attribute_class = attr(&hero.primary_attribute.to_lowercase()),
            href = attr(&hero_href(&hero.name)),
            image = attr(&hero.image_url),
            alt = attr(&hero.name),
            name = text(&hero.name),
            attribute = text(&hero.primary_attribute),
        );
    }

    body.push_str("</ul>");
    layout("Heroes", user, &body)
}

pub fn auth(user: Option<&SessionUser>) -> Html<String> {
    let body = r#"<h1>Account</h1>
<section class="auth">
<form method="post" action="/login">
<h2>Sign in</h2>
<label>Email or username <input name="User_name" required></label>
<label>Password <input type="password" name="User_password" required></label>
<button type="submit">Sign in</button>
</form>
<form method="post" action="/registration">
<h2>Register</h2>
<label>Email <input type="email" name="User_email" required></label>
<label>Username <input name="User_name" required></label>
<label>Password <input type="password" name="User_password" required></label>
<label>Repeat password <input type="password" name="User_password_confirm" required></label>
<button type="submit">Register</button>
</form>
</section>"#;
    layout("Sign in", user, body)
}

pub fn feedback(user: Option<&SessionUser>) -> Html<String> {
    let body = r#"<h1>Feedback</h1>
<form method="post" action="/feedback_answer" class="feedback">
<label>Name <input name="Username" required></label>
<label>Email <input type="email" name="Useremail" required></label>
<label>Theme <input name="Theme" required></label>
<label>Message <textarea name="Message" rows="6" required></textarea></label>
<button type="submit">Send</button>
</form>"#;
    layout("Feedback", user, body)
}

fn ability_block(ability: &Ability) -> String {
    let mut block = format!(
        r#"<article class="ability"><img src="{image}" alt="{alt}"><h3>{name}</h3>"#,
        image = attr(&ability.image_url),
        alt = attr(&ability.name),
        name = text(&ability.name),
    );

    if let Some(video) = &ability.video_url {
        let _ = write!(
            block,
            r#"<video src="{}" controls muted loop preload="none"></video>"#,
            attr(video)
        );
    }

    let _ = write!(
        block,
        r#"<p>{}</p><pre class="specification">{}</pre></article>"#,
        text(&ability.description),
        text(&ability.specification),
    );
    block
}

fn comment_block(comment: &Comment) -> String {
    format!(
        r#"<li class="comment"><strong>{}</strong> <span>{}</span></li>"#,
        text(&comment.username),
        text(&comment.text),
    )
}

pub fn hero(detail: &HeroDetail, user: Option<&SessionUser>) -> Html<String> {
    let hero = &detail.hero;
    let mut body = format!(
        r#"<section class="hero" style="{style}">
<img class="portrait" src="{image}" alt="{alt}">
<h1>{name}</h1>
<dl>
<dt>Primary attribute</dt><dd>{attribute}</dd>
<dt>Attack type</dt><dd>{attack_type}</dd>
<dt>Complexity</dt><dd>{complexity}</dd>
</dl>
"#,
        style = attr(&hero_style(hero)),
        image = attr(&hero.image_url),
        alt = attr(&hero.name),
        name = text(&hero.name),
        attribute = text(&hero.primary_attribute),
        attack_type = text(&hero.attack_type),
        complexity = text(&hero.complexity),
    );

    if let Some(description) = &hero.short_description {
        let _ = writeln!(body, "<p class=\"summary\">{}</p>", text(description));
    }
    if let Some(story) = &hero.full_story_url {
        let _ = writeln!(
            body,
            r#"<a class="story" href="{}">Full story</a>"#,
            attr(story)
        );
    }
    body.push_str("</section>\n<section class=\"abilities\">\n<h2>Abilities</h2>\n");

    for ability in &detail.abilities {
        body.push_str(&ability_block(ability));
        body.push('\n');
    }

    body.push_str("</section>\n<section class=\"comments\">\n<h2>Comments</h2>\n<ul>\n");
    for comment in &detail.comments {
        body.push_str(&comment_block(comment));
        body.push('\n');
    }
    body.push_str("</ul>\n");

    if user.is_some() {
        let _ = write!(
            body,
            r#"<form method="post" action="/add_comment">
<input type="hidden" name="hero_id" value="{}">
<textarea name="comment" rows="3" required></textarea>
<button type="submit">Comment</button>
</form>
"#,
            hero.hero_id
        );
    } else {
        body.push_str(r#"<p><a href="/auth">Sign in</a> to leave a comment.</p>"#);
    }
    body.push_str("</section>");

    layout(&hero.name, user, &body)
}

const HERO_TEXT_FIELDS: [(&str, &str); 10] = [
    ("name", "Name"),
    ("primary_attribute", "Primary attribute"),
    ("attack_type", "Attack type"),
    ("complexity", "Complexity"),
    ("short_description", "Short description"),
    ("full_story_url", "Full story URL"),
    ("background_color", "Background color"),
    ("text_color", "Text color"),
    ("highlight_color", "Highlight color"),
    ("secondary_color", "Secondary color"),
];

fn hero_value<'a>(hero: &'a Hero, field: &str) -> &'a str {
    match field {
        "name" => &hero.name,
        "primary_attribute" => &hero.primary_attribute,
        "attack_type" => &hero.attack_type,
        "complexity" => &hero.complexity,
        "short_description" => hero.short_description.as_deref().unwrap_or_default(),
        "full_story_url" => hero.full_story_url.as_deref().unwrap_or_default(),
        "background_color" => hero.background_color.as_deref().unwrap_or_default(),
        "text_color" => hero.text_color.as_deref().unwrap_or_default(),
        "highlight_color" => hero.highlight_color.as_deref().unwrap_or_default(),
        "secondary_color" => hero.secondary_color.as_deref().unwrap_or_default(),
        _ => "",
    }
}

fn hero_inputs(hero: Option<&Hero>) -> String {
    let mut inputs = String::new();
    for (index, (field, label)) in HERO_TEXT_FIELDS.iter().enumerate() {
        let value = hero.map_or("", |h| hero_value(h, field));
        let required = if index < 4 { " required" } else { "" };
        let _ = writeln!(
            inputs,
            r#"<label>{label} <input name="{field}" value="{}"{required}></label>"#,
            attr(value)
        );
    }
    inputs
}

fn ability_inputs(ability: Option<&Ability>) -> String {
    let (name, description, specification) = ability.map_or(("", "", ""), |a| {
        (
            a.name.as_str(),
            a.description.as_str(),
            a.specification.as_str(),
        )
    });

    format!(
        r#"<label>Name <input name="name" value="{}" required></label>
<label>Description <textarea name="description" rows="3" required>{}</textarea></label>
<label>Specification (JSON) <textarea name="specification" rows="4" required>{}</textarea></label>
"#,
        attr(name),
        text(description),
        text(specification),
    )
}

pub fn admin(heroes: &[Hero], user: Option<&SessionUser>) -> Html<String> {
    let mut body = String::from("<h1>Administration</h1>\n<section class=\"hero-list\">\n<h2>Heroes</h2>\n<table>\n");

    for hero in heroes {
        let _ = writeln!(
            body,
            r#"<tr><td><img src="{image}" alt="" width="48"></td><td>{name}</td><td><a href="/edit_hero/{id}">Edit</a></td><td><form method="post" action="/Delete_card?_method=DELETE"><input type="hidden" name="hero_id" value="{id}"><button type="submit">Delete</button></form></td></tr>"#,
            image = attr(&hero.image_url),
            name = text(&hero.name),
            id = hero.hero_id,
        );
    }
    body.push_str("</table>\n</section>\n");

    let _ = write!(
        body,
        r#"<section class="add-hero">
<h2>Add hero</h2>
<form method="post" action="/Add_card" enctype="multipart/form-data">
{inputs}<label>Portrait <input type="file" name="image_url" accept="image/*" required></label>
<label>Background <input type="file" name="background_image_url" accept="image/*" required></label>
<button type="submit">Add hero</button>
</form>
</section>
"#,
        inputs = hero_inputs(None),
    );

    let mut options = String::new();
    for hero in heroes {
        let _ = write!(
            options,
            r#"<option value="{}">{}</option>"#,
            hero.hero_id,
            text(&hero.name)
        );
    }

    let _ = write!(
        body,
        r#"<section class="add-ability">
<h2>Add ability</h2>
<form method="post" action="/Add_ability" enctype="multipart/form-data">
<label>Hero <select name="hero_id" required>{options}</select></label>
{inputs}<label>Icon <input type="file" name="image_url" accept="image/*" required></label>
<label>Video <input type="file" name="video_url" accept="video/*"></label>
<button type="submit">Add ability</button>
</form>
</section>
<p><a href="/get_feedback">Visitor feedback (JSON)</a></p>"#,
        inputs = ability_inputs(None),
    );

    layout("Administration", user, &body)
}

pub fn edit_hero(data: &HeroWithAbilities, user: Option<&SessionUser>) -> Html<String> {
    let hero = &data.hero;
    let mut body = format!(
        r#"<h1>Edit {name}</h1>
<form method="post" action="/hero_edit/{id}?_method=PUT" enctype="multipart/form-data" class="edit-hero">
{inputs}<label>Portrait <img src="{image}" alt="" width="64"> <input type="file" name="image_url" accept="image/*"></label>
<label>Background <img src="{background}" alt="" width="64"> <input type="file" name="background_image_url" accept="image/*"></label>
<button type="submit">Save hero</button>
</form>
<h2>Abilities</h2>
"#,
        name = text(&hero.name),
        id = hero.hero_id,
        inputs = hero_inputs(Some(hero)),
        image = attr(&hero.image_url),
        background = attr(&hero.background_image_url),
    );

    if data.abilities.is_empty() {
        body.push_str("<p class=\"empty\">No abilities yet.</p>\n");
    }

    for ability in &data.abilities {
        let _ = writeln!(
            body,
            r#"<form method="post" action="/edit_ability/{ability_id}?_method=PUT" enctype="multipart/form-data" class="edit-ability">
<input type="hidden" name="hero_id" value="{hero_id}">
{inputs}<label>Icon <img src="{image}" alt="" width="48"> <input type="file" name="image_url" accept="image/*"></label>
<label>Video <input type="file" name="video_url" accept="video/*"></label>
<button type="submit">Save ability</button>
</form>
<form method="post" action="/delete_ability/{ability_id}?_method=DELETE"><button type="submit">Delete ability</button></form>"#,
            ability_id = ability.ability_id,
            hero_id = ability.hero_id,
            inputs = ability_inputs(Some(ability)),
            image = attr(&ability.image_url),
        );
    }

    layout(&format!("Edit {}", hero.name), user, &body)
}

/// Outcome page shared by confirmations and errors.
pub fn message(message: &str, link: &str, user: Option<&SessionUser>) -> Html<String> {
    let body = format!(
        r#"<section class="message"><p>{}</p><a href="{}">Continue</a></section>"#,
        text(message),
        attr(link),
    );
    layout("Herodex", user, &body)
}

pub fn not_found() -> Html<String> {
    layout(
        "Not found",
        None,
        r#"<section class="not-found"><h1>404</h1><p>This page does not exist.</p><a href="/">Back to the heroes</a></section>"#,
    )
}
