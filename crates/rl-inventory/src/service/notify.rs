//! Confirmation message builder.
//!
//! One message per paid reservation, summarizing the purchased numbers with
//! their companion-series numbers, the fixed per-ticket price, the computed
//! total, the buyer's contact details and the registration timestamp. The
//! dispatcher owns delivery; nothing here blocks or fails the reservation.

use chrono::{DateTime, Utc};

use crate::domain::UserInfo;

/// Fixed price per ticket, in pesos.
pub const TICKET_PRICE: u32 = 50;

/// Each purchased number also plays in three companion series offset by
/// these amounts (a 1000-ticket pool split into four series of 250).
const SERIES_OFFSETS: [i64; 3] = [250, 500, 750];

/// Subject and plain-text body for a reservation confirmation.
pub fn build_confirmation(
    info: &UserInfo,
    ticket_numbers: &[String],
    registered_at: DateTime<Utc>,
) -> (String, String) {
    let subject = format!("TICKET RESERVATION CONFIRMATION FOR {}", info.full_name);

    let count = ticket_numbers.len();
    let total_cost = count as u32 * TICKET_PRICE;
    // Day and month render unpadded: 3/4/2024, not 03/04/2024.
    let timestamp = registered_at.format("%-d/%-m/%Y %H:%M");

    let body = format!(
        "HELLO,\n\
         YOU HAVE RESERVED {count} TICKET(S): {numbers}.\n\
         . THE TOTAL TO PAY IS: ${total_cost} PESOS.\n\
         . UNDER THE NAME: {name}.\n\
         . FROM: {city} {state}.\n\
         . PHONE NUMBER: {phone}.\n\
         TICKET REGISTRATION DATE: {timestamp} hours.\n\
         \n\
         Thanks! Regards,\n\
         The Raffleline team",
        count = count,
        numbers = companion_series(ticket_numbers),
        total_cost = total_cost,
        name = info.full_name,
        city = info.city,
        state = info.state,
        phone = info.phone_number,
        timestamp = timestamp,
    );

    (subject, body)
}

/// Render each number with its three companions: `[3] [253] [503] [753]`.
/// Non-numeric ticket strings fall back to the literal number alone.
fn companion_series(ticket_numbers: &[String]) -> String {
    ticket_numbers
        .iter()
        .flat_map(|ticket| match ticket.parse::<i64>() {
            Ok(base) => std::iter::once(base)
                .chain(SERIES_OFFSETS.iter().map(move |offset| base + offset))
                .map(|n| format!("[{n}]"))
                .collect::<Vec<_>>(),
            Err(_) => vec![format!("[{ticket}]")],
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn info() -> UserInfo {
        UserInfo {
            full_name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            city: "Hermosillo".to_string(),
            state: "Sonora".to_string(),
            phone_number: "5255123456".to_string(),
        }
    }

    #[test]
    fn companion_series_expands_each_number() {
        let rendered = companion_series(&["003".to_string(), "017".to_string()]);
        assert_eq!(rendered, "[3] [253] [503] [753] [17] [267] [517] [767]");
    }

    #[test]
    fn body_carries_total_cost_and_contact_details() {
        let at = Utc.with_ymd_and_hms(2024, 3, 22, 18, 5, 0).unwrap();
        let (subject, body) =
            build_confirmation(&info(), &["003".to_string(), "017".to_string()], at);

        assert_eq!(subject, "TICKET RESERVATION CONFIRMATION FOR Ana Torres");
        assert!(body.contains("RESERVED 2 TICKET(S)"));
        assert!(body.contains("$100 PESOS"));
        assert!(body.contains("Ana Torres"));
        assert!(body.contains("Hermosillo Sonora"));
        assert!(body.contains("5255123456"));
        assert!(body.contains("22/3/2024 18:05"));
    }

    #[test]
    fn timestamp_day_and_month_are_unpadded() {
        let at = Utc.with_ymd_and_hms(2024, 4, 3, 9, 7, 0).unwrap();
        let (_, body) = build_confirmation(&info(), &["003".to_string()], at);
        assert!(body.contains("3/4/2024 09:07"));
    }
}
