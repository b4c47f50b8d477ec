//! The fact of a star schema.
//!
//! A [`Fact`] is rendered as a single node whose label is an HTML-like table:
//! a highlighted header cell holding the fact name followed by one row per
//! attribute.

/// Central measure table of a star schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    name: String,
    attributes: Vec<String>,
}

impl Fact {
    /// Creates a fact with the given name and ordered attribute names.
    pub fn new<S: AsRef<str>>(name: impl Into<String>, attributes: &[S]) -> Self {
        Self {
            name: name.into(),
            attributes: attributes
                .iter()
                .map(|attr| attr.as_ref().to_string())
                .collect(),
        }
    }

    /// Returns the fact name, also used as its node identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute names in display order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Builds the HTML-like table markup used as the node label.
    ///
    /// The returned markup does not include the outer `<` `>` delimiters.
    ///
    /// ```
    /// use dfm_core::fact::Fact;
    ///
    /// let fact = Fact::new("Sales", &["qty"]);
    /// let table = fact.table_label();
    /// assert!(table.starts_with("<table"));
    /// assert!(table.contains(r#"<td bgcolor="lightblue">Sales</td>"#));
    /// assert!(table.contains("<tr> <td>qty</td> </tr>"));
    /// ```
    pub fn table_label(&self) -> String {
        let rows: String = self
            .attributes
            .iter()
            .map(|attribute| format!("<tr> <td>{}</td> </tr>", escape_html(attribute)))
            .collect();

        format!(
            r#"<table border="0" cellborder="1" cellspacing="0" cellpadding="20"> <tr> <td bgcolor="lightblue">{}</td> </tr>{rows}</table>"#,
            escape_html(&self.name)
        )
    }
}

/// Escapes characters that would break HTML-like label markup.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
