//! Server-rendered HTML for the catalog index page.

use std::fmt::Write;

use spotlist_core::Spot;

/// Escape text for use in HTML element content and quoted attributes.
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

/// Render the index page listing `spots` in the order given.
///
/// `query` pre-fills the search box when the page is a search result.
pub fn render_index(spots: &[Spot], query: Option<&str>) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Tourist Spots</title>
</head>
<body>
<h1>Tourist Spots</h1>
"#,
    );

    let _ = write!(
        html,
        r#"<form class="search" method="get" action="/search">
<input type="text" name="q" value="{}" placeholder="Search name or description">
<button type="submit">Search</button>
</form>
"#,
        escape_html(query.unwrap_or_default())
    );

    html.push_str(
        r#"<form class="add" method="post" action="/add">
<input type="text" name="name" placeholder="Name">
<input type="text" name="description" placeholder="Description">
<input type="text" name="ticket" placeholder="Ticket">
<input type="text" name="transport" placeholder="Transport">
<input type="text" name="imageurl" placeholder="Image URL">
<button type="submit">Add</button>
</form>
"#,
    );

    if spots.is_empty() {
        html.push_str("<p class=\"empty\">No spots found.</p>\n");
    } else {
        render_table(&mut html, spots);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_table(html: &mut String, spots: &[Spot]) {
    // Per-row forms cannot nest inside the batch form, so checkboxes attach
    // to it through the form attribute.
    html.push_str(
        r#"<form id="batch" method="post" action="/batchdelete"></form>
<table>
<thead>
<tr><th></th><th>Name</th><th>Description</th><th>Ticket</th><th>Transport</th><th>Image</th><th>Recommended</th><th>Actions</th></tr>
</thead>
<tbody>
"#,
    );

    for spot in spots {
        render_row(html, spot);
    }

    html.push_str(
        r#"</tbody>
</table>
<button type="submit" form="batch">Delete selected</button>
"#,
    );
}

fn render_row(html: &mut String, spot: &Spot) {
    let id = spot.id;
    let image = if spot.image_url.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img src="{}" alt="{}" width="120">"#,
            escape_html(&spot.image_url),
            escape_html(&spot.name)
        )
    };

    let _ = write!(
        html,
        r#"<tr id="spot-{id}">
<td><input type="checkbox" name="ids" value="{id}" form="batch"></td>
<td>{name}</td>
<td>{description}</td>
<td>{ticket}</td>
<td>{transport}</td>
<td>{image}</td>
<td>{count}</td>
<td>
<form method="post" action="/recommend/{id}"><button type="submit">Recommend</button></form>
<form method="post" action="/delete/{id}"><button type="submit">Delete</button></form>
<form method="post" action="/update/{id}">
<input type="text" name="name" placeholder="{name}">
<input type="text" name="description" placeholder="{description}">
<input type="text" name="ticket" placeholder="{ticket}">
<input type="text" name="transport" placeholder="{transport}">
<input type="text" name="imageurl" placeholder="{image_url}">
<button type="submit">Update</button>
</form>
</td>
</tr>
"#,
        name = escape_html(&spot.name),
        description = escape_html(&spot.description),
        ticket = escape_html(&spot.ticket),
        transport = escape_html(&spot.transport),
        image_url = escape_html(&spot.image_url),
        count = spot.recommend_count,
    );
}
