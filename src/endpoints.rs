//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}',
//! use [format_endpoint].

/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between a left brace and the next right brace,
/// e.g. '{transaction_id}' in '/transactions/{transaction_id}'.
/// Only the first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints::{self, format_endpoint};

    #[test]
    fn endpoints_are_valid_uris() {
        assert!(endpoints::TRANSACTIONS.parse::<Uri>().is_ok());
        assert!(endpoints::TRANSACTION.parse::<Uri>().is_ok());
    }

    #[test]
    fn replaces_parameter() {
        let formatted_path = format_endpoint(endpoints::TRANSACTION, 12);

        assert_eq!(formatted_path, "/transactions/12");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        assert_eq!(format_endpoint("/hello/{world}/bye", -1), "/hello/-1/bye");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint("/hello/world", 1), "/hello/world");
    }
}
