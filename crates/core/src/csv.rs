//! Client CSV export/import mapping.
//!
//! Column layout follows the FreshBooks-style contact export: the first and
//! last name columns are split from the client display name on export and
//! rejoined on import. Phone numbers are exported with a leading apostrophe
//! so spreadsheets keep them as text; the apostrophe is stripped on import.

/// Export header row. Column order is part of the format.
pub const CLIENT_EXPORT_HEADERS: [&str; 12] = [
    "Organization",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Address Line 1",
    "Address Line 2",
    "City",
    "Province/State",
    "Country",
    "Postal Code",
    "Notes",
];

/// Client fields carried through the CSV format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCsvFields {
    /// Display name (split into first/last columns on export).
    pub display_name: String,
    /// Company name (the "Organization" column).
    pub company: String,
    /// Email address.
    pub email: String,
    /// Phone number, without the spreadsheet apostrophe.
    pub phone: String,
    /// Address line 1.
    pub address_line1: String,
    /// Address line 2.
    pub address_line2: String,
    /// City.
    pub city: String,
    /// Province or state.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub postal_code: String,
    /// Free-form notes.
    pub notes: String,
}

/// Quotes a CSV value when it contains a comma, quote, or line break;
/// embedded quotes are doubled.
#[must_use]
pub fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders clients as a CSV document (`\r\n` line endings, header first).
#[must_use]
pub fn export_clients(clients: &[ClientCsvFields]) -> String {
    let mut lines = Vec::with_capacity(clients.len() + 1);
    lines.push(CLIENT_EXPORT_HEADERS.join(","));

    for client in clients {
        let name = client.display_name.trim();
        let (first_name, last_name) = match name.split_once(' ') {
            Some((first, rest)) => (first, rest),
            None => (name, ""),
        };
        let phone = if client.phone.is_empty() {
            String::new()
        } else {
            format!("'{}", client.phone)
        };

        let row = [
            client.company.as_str(),
            first_name,
            last_name,
            client.email.as_str(),
            phone.as_str(),
            client.address_line1.as_str(),
            client.address_line2.as_str(),
            client.city.as_str(),
            client.state.as_str(),
            client.country.as_str(),
            client.postal_code.as_str(),
            client.notes.as_str(),
        ];
        let escaped: Vec<String> = row.iter().map(|v| escape_csv(v)).collect();
        lines.push(escaped.join(","));
    }

    lines.join("\r\n")
}

/// Splits one CSV line into fields, honoring quoted values and doubled
/// quotes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields.into_iter().map(|f| f.trim().to_string()).collect()
}

/// Strips the spreadsheet apostrophe from an exported phone value.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.trim().trim_start_matches('\'').trim_end_matches('\'').to_string()
}

/// Parses an exported CSV document back into client fields.
///
/// Columns are matched by header name, so reordered columns still import.
/// Blank lines and rows with no identifying field (name, company, email,
/// phone, address) are skipped. A row with only an address still imports,
/// with the display name falling back to the company or "Imported Client".
#[must_use]
pub fn import_clients(text: &str) -> Vec<ClientCsvFields> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_line(header_line);

    let field = |row: &[String], name: &str| -> String {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    };

    let mut clients = Vec::new();
    for line in lines {
        let row = split_line(line);

        let first_name = field(&row, "First Name");
        let last_name = field(&row, "Last Name");
        let company = field(&row, "Organization");
        let email = field(&row, "Email");
        let phone = normalize_phone(&field(&row, "Phone"));
        let address_line1 = field(&row, "Address Line 1");
        let address_line2 = field(&row, "Address Line 2");

        let name = format!("{first_name} {last_name}").trim().to_string();
        let has_identity = !(name.is_empty()
            && company.is_empty()
            && email.is_empty()
            && phone.is_empty()
            && address_line1.is_empty()
            && address_line2.is_empty());
        if !has_identity {
            continue;
        }

        let display_name = if !name.is_empty() {
            name
        } else if !company.is_empty() {
            company.clone()
        } else {
            "Imported Client".to_string()
        };

        clients.push(ClientCsvFields {
            display_name,
            company,
            email,
            phone,
            address_line1,
            address_line2,
            city: field(&row, "City"),
            state: field(&row, "Province/State"),
            country: field(&row, "Country"),
            postal_code: field(&row, "Postal Code"),
            notes: field(&row, "Notes"),
        });
    }

    clients
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("has,comma", "\"has,comma\"")]
    #[case("has \"quote\"", "\"has \"\"quote\"\"\"")]
    #[case("line\nbreak", "\"line\nbreak\"")]
    #[case("", "")]
    fn test_escape_csv(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_csv(input), expected);
    }

    #[rstest]
    #[case("'5551234", "5551234")]
    #[case("'5551234'", "5551234")]
    #[case("+1 202 555 0185", "+1 202 555 0185")]
    #[case("  '555  ", "555")]
    #[case("", "")]
    fn test_normalize_phone(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_phone(input), expected);
    }

    fn sample_client() -> ClientCsvFields {
        ClientCsvFields {
            display_name: "Ada Lovelace".to_string(),
            company: "Analytical Engines, Ltd".to_string(),
            email: "ada@example.com".to_string(),
            phone: "5551234".to_string(),
            address_line1: "1 Byron Street".to_string(),
            address_line2: String::new(),
            city: "London".to_string(),
            state: String::new(),
            country: "UK".to_string(),
            postal_code: "W1".to_string(),
            notes: "Says \"hello\"".to_string(),
        }
    }

    #[test]
    fn test_export_header_and_phone_apostrophe() {
        let csv = export_clients(&[sample_client()]);
        let mut lines = csv.split("\r\n");
        assert_eq!(
            lines.next().unwrap(),
            "Organization,First Name,Last Name,Email,Phone,Address Line 1,Address Line 2,City,Province/State,Country,Postal Code,Notes"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("'5551234"));
        assert!(row.contains("\"Analytical Engines, Ltd\""));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let original = vec![
            sample_client(),
            ClientCsvFields {
                display_name: "Cher".to_string(),
                email: "cher@example.com".to_string(),
                ..ClientCsvFields::default()
            },
        ];

        let imported = import_clients(&export_clients(&original));
        assert_eq!(imported, original);
    }

    #[test]
    fn test_import_skips_blank_and_empty_rows() {
        let csv = "Organization,First Name,Last Name,Email,Phone,Address Line 1,Address Line 2,City,Province/State,Country,Postal Code,Notes\r\n\
                   ,,,,,,,,,,,\r\n\
                   \r\n\
                   Acme,,,sales@acme.test,,,,,,,,";
        let imported = import_clients(csv);
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].display_name, "Acme");
        assert_eq!(imported[0].company, "Acme");
        assert_eq!(imported[0].email, "sales@acme.test");
    }

    #[test]
    fn test_import_name_fallbacks() {
        let csv = "Organization,First Name,Last Name,Email\r\n\
                   ,Grace,Hopper,grace@navy.mil\r\n\
                   ,,,lonely@example.com";
        let imported = import_clients(csv);
        assert_eq!(imported[0].display_name, "Grace Hopper");
        assert_eq!(imported[1].display_name, "Imported Client");
    }

    #[test]
    fn test_import_empty_document() {
        assert!(import_clients("").is_empty());
    }
}
