//! Flight list filtering
//!
//! Shared by the admin client's derived view and the `GET /api/vuelos` query.

/// Anything with a destination and a departure date can be filtered
pub trait Scheduled {
    fn destination(&self) -> &str;
    /// Departure date as stored, normally `YYYY-MM-DD`
    fn departure_date(&self) -> &str;
}

/// Keep the flights matching both filters, in their original order
///
/// An empty filter matches everything. The destination filter is a
/// case-insensitive substring match; the date filter is an exact string match.
pub fn filter_flights<'a, T: Scheduled>(flights: &'a [T], destination: &str, date: &str) -> Vec<&'a T> {
    let needle = destination.to_lowercase();

    flights
        .iter()
        .filter(|flight| needle.is_empty() || flight.destination().to_lowercase().contains(&needle))
        .filter(|flight| date.is_empty() || flight.departure_date() == date)
        .collect()
}
