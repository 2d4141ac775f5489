//! HTML pages rendered by the web handler.

use bson::DateTime;
use chrono::Utc;

use crate::model::Dog;

const TITLE: &str = "Dog Amazon";

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{TITLE}</h1>\n\
         {body}\
         </body>\n\
         </html>\n"
    )
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

fn format_date(at: &DateTime) -> String {
    let at: chrono::DateTime<Utc> = (*at).into();

    at.format("%Y-%m-%d").to_string()
}

fn dog_item(dog: &Dog) -> String {
    let mut item = format!("<li class=\"dog\">\n<h2>{}</h2>\n", escape_html(&dog.name));

    if let Some(url) = &dog.photo_url {
        item.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape_html(url),
            escape_html(&dog.name)
        ));
    }

    let mut facts = Vec::new();

    if let Some(age) = dog.age {
        facts.push(format!("Age: {age}"));
    }
    if let Some(color) = &dog.color {
        facts.push(format!("Color: {}", escape_html(color)));
    }
    if let Some(country) = &dog.country {
        facts.push(format!("Country: {}", escape_html(country)));
    }
    if !dog.toys.is_empty() {
        let toys = dog.toys
            .iter()
            .map(|toy| escape_html(toy))
            .collect::<Vec<_>>();
        facts.push(format!("Toys: {}", toys.join(", ")));
    }
    if !dog.vet_visits.is_empty() {
        let visits = dog.vet_visits
            .iter()
            .map(format_date)
            .collect::<Vec<_>>();
        facts.push(format!("Vet visits: {}", visits.join(", ")));
    }

    if !facts.is_empty() {
        item.push_str("<ul>\n");
        for fact in facts {
            item.push_str(&format!("<li>{fact}</li>\n"));
        }
        item.push_str("</ul>\n");
    }

    item.push_str("</li>\n");
    item
}

/// The home page: every listed dog, or an empty-state message.
pub fn index(dogs: &[Dog]) -> String {
    if dogs.is_empty() {
        return layout("<p class=\"empty\">No dogs yet.</p>\n");
    }

    let items = dogs
        .iter()
        .map(dog_item)
        .collect::<String>();

    layout(&format!("<ul class=\"dogs\">\n{items}</ul>\n"))
}

/// Shown when the dog listing could not be loaded.
pub fn dog_error() -> String {
    layout("<p class=\"error\">Sorry, we couldn't fetch the dogs right now. Please try again later.</p>\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Rex\" & 'Fido'</b>"),
            "&lt;b&gt;&quot;Rex&quot; &amp; &#39;Fido&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn lists_dog_details() {
        let dog = Dog::builder("Koda <3")
            .age(3)
            .color("brown")
            .toy("Ball")
            .toy("Rope Toy")
            .vet_visit(DateTime::from_millis(1_548_979_200_000))
            .country("US")
            .photo_url("https://example.com/koda.jpg")
            .build()
            .unwrap();

        let page = index(&[dog]);

        assert!(page.contains("<h2>Koda &lt;3</h2>"));
        assert!(page.contains("Age: 3"));
        assert!(page.contains("Toys: Ball, Rope Toy"));
        assert!(page.contains("Vet visits: 2019-02-01"));
        assert!(page.contains("<img src=\"https://example.com/koda.jpg\""));
    }

    #[test]
    fn empty_listing_says_so() {
        assert!(index(&[]).contains("No dogs yet."));
    }
}
