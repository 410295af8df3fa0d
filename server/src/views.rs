//! HTML pages.
//!
//! Plain string rendering: every page is the shared layout wrapped around a
//! body fragment. All user text passes through `escape`.

use std::fmt::Write;

use todo_core::{Flash, List, NAME_MAX_CHARS};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, flash: &Flash, body: &str) -> String {
    let mut messages = String::new();
    if let Some(error) = &flash.error {
        let _ = write!(messages, r#"<div class="flash error"><p>{}</p></div>"#, escape(error));
    }
    if let Some(success) = &flash.success {
        let _ = write!(messages, r#"<div class="flash success"><p>{}</p></div>"#, escape(success));
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<header><h1><a href="/lists">Todo Tracker</a></h1></header>
{messages}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn lists_page(lists: &[&List], flash: &Flash) -> String {
    let mut body = String::from(r#"<section id="lists"><ul>"#);
    for list in lists {
        let class = if list.is_complete() { "complete" } else { "" };
        let _ = write!(
            body,
            r#"<li class="{class}"><a href="/lists/{id}"><h2>{name}</h2><p>{remaining} / {total}</p></a></li>"#,
            id = list.id,
            name = escape(&list.name),
            remaining = list.remaining(),
            total = list.len(),
        );
    }
    body.push_str(r#"</ul></section><p><a href="/lists/new">New List</a></p>"#);
    layout("Todo Lists", flash, &body)
}

fn list_name_form(action: &str, value: &str, submit: &str) -> String {
    format!(
        r#"<form action="{action}" method="post">
<label for="list_name">Enter the name for the list:</label>
<input id="list_name" name="list_name" maxlength="{NAME_MAX_CHARS}" value="{value}" placeholder="List Name" type="text">
<input type="submit" value="{submit}">
</form>"#,
        value = escape(value),
    )
}

/// Creation form, pre-filled with `attempted` after a rejected submit.
pub fn new_list_page(attempted: &str, flash: &Flash) -> String {
    let body = format!(
        r#"{form}<p><a href="/lists">Cancel</a></p>"#,
        form = list_name_form("/lists", attempted, "Save"),
    );
    layout("New List", flash, &body)
}

pub fn edit_list_page(list: &List, value: &str, flash: &Flash) -> String {
    let body = format!(
        r#"<h2>Editing '{name}'</h2>
{form}
<form action="/lists/{id}/destroy" method="post"><button type="submit">Delete List</button></form>
<p><a href="/lists/{id}">Cancel</a></p>"#,
        name = escape(&list.name),
        form = list_name_form(&format!("/lists/{}", list.id), value, "Save"),
        id = list.id,
    );
    layout("Edit List", flash, &body)
}

pub fn list_page(list: &List, flash: &Flash) -> String {
    let id = list.id;
    let mut body = format!(
        r#"<section id="todos" class="{class}">
<header><h2>{name}</h2>
<form action="/lists/{id}/complete" method="post"><button type="submit">Complete All</button></form>
<a href="/lists/{id}/edit">Edit List</a></header>
<ul>"#,
        class = if list.is_complete() { "complete" } else { "" },
        name = escape(&list.name),
    );
    for todo in list.todos_sorted() {
        let _ = write!(
            body,
            r#"<li class="{class}">
<form action="/lists/{id}/todos/{todo_id}/check" method="post"><button type="submit">{label}</button></form>
<h3>{name}</h3>
<form action="/lists/{id}/todos/{todo_id}/destroy" method="post"><button type="submit">Delete</button></form>
</li>"#,
            class = if todo.completed { "complete" } else { "" },
            label = if todo.completed { "Uncheck" } else { "Check" },
            todo_id = todo.id,
            name = escape(&todo.name),
        );
    }
    let _ = write!(
        body,
        r#"</ul></section>
<form action="/lists/{id}/todos" method="post">
<label for="todo">Enter a new todo item:</label>
<input id="todo" name="todo" maxlength="{NAME_MAX_CHARS}" placeholder="Something to do" type="text">
<input type="submit" value="Add">
</form>
<p><a href="/lists">All Lists</a></p>"#
    );
    layout(&list.name, flash, &body)
}

/// Page for requests that cannot be served, such as a stale list id.
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"<h2>{}</h2><p>{}</p><p><a href="/lists">All Lists</a></p>"#,
        escape(title),
        escape(message)
    );
    layout(title, &Flash::default(), &body)
}
