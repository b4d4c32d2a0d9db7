use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::OrderSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    ReceivedDate,
    Priority,
    OrderNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: SortColumn::ReceivedDate,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header-click semantics: clicking the active column flips the
    /// direction, clicking a different column resets to descending.
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            let direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
            Self { column, direction }
        } else {
            Self {
                column,
                direction: SortDirection::Desc,
            }
        }
    }
}

/// Conjunctive filter over the in-memory order set. `None` is the "all"
/// sentinel and matches everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub status_id: Option<Uuid>,
    pub priority_id: Option<Uuid>,
}

impl OrderFilter {
    pub fn matches(&self, order: &OrderSummary) -> bool {
        self.matches_search(order) && self.matches_status(order) && self.matches_priority(order)
    }

    fn matches_search(&self, order: &OrderSummary) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };
        let haystacks = [
            Some(order.order_number.as_str()),
            Some(order.client_name.as_str()),
            Some(order.device_type.as_str()),
            order.device_brand.as_deref(),
            order.device_model.as_deref(),
        ];
        haystacks
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_status(&self, order: &OrderSummary) -> bool {
        self.status_id.is_none_or(|id| order.status_id == id)
    }

    fn matches_priority(&self, order: &OrderSummary) -> bool {
        self.priority_id.is_none_or(|id| order.priority_id == id)
    }
}

/// Applies the filter and a stable sort. Date ordering uses the ISO
/// `received_date` column, never a display-formatted string; priority uses
/// the registry rank (Alta=3, Media=2, Baja=1), never the label.
pub fn filter_and_sort(
    orders: Vec<OrderSummary>,
    filter: &OrderFilter,
    sort: SortSpec,
) -> Vec<OrderSummary> {
    let mut selected: Vec<OrderSummary> = orders
        .into_iter()
        .filter(|order| filter.matches(order))
        .collect();

    selected.sort_by(|a, b| {
        let ordering = match sort.column {
            SortColumn::ReceivedDate => a.received_date.cmp(&b.received_date),
            SortColumn::Priority => a.priority_rank.cmp(&b.priority_rank),
            SortColumn::OrderNumber => a.order_number.cmp(&b.order_number),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn order(
        number: &str,
        client: &str,
        device: &str,
        brand: &str,
        priority: (&str, i32),
        day: u32,
    ) -> OrderSummary {
        OrderSummary {
            id: Uuid::new_v4(),
            order_number: number.into(),
            client_name: client.into(),
            client_phone: None,
            client_email: None,
            device_type: device.into(),
            device_brand: Some(brand.into()),
            device_model: None,
            serial_number: None,
            description: None,
            status_id: Uuid::new_v4(),
            status_name: "En servicio".into(),
            priority_id: priority_id_for(priority.0),
            priority_name: priority.0.into(),
            priority_rank: priority.1,
            received_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            estimated_delivery: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, day, 10, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, day, 10, 0, 0).unwrap(),
            time_since_created: String::new(),
        }
    }

    fn priority_id_for(name: &str) -> Uuid {
        // Deterministic per-name ids so filters can reference them.
        let seed = match name {
            "Alta" => 1u128,
            "Media" => 2,
            _ => 3,
        };
        Uuid::from_u128(seed)
    }

    fn fixture() -> Vec<OrderSummary> {
        vec![
            order("UJ-2026-015", "María Rodríguez", "Reloj Rolex", "Rolex", ("Alta", 3), 15),
            order("UJ-2026-014", "Andrés López", "Collar de oro", "Cartier", ("Media", 2), 14),
            order("UJ-2026-013", "Sofía Martínez", "Anillo diamante", "Tiffany", ("Baja", 1), 13),
            order("UJ-2026-012", "Carlos Gómez", "Pulsera plata", "David Yurman", ("Media", 2), 12),
            order("UJ-2026-011", "Roberto Sánchez", "Reloj Cartier", "Cartier", ("Alta", 3), 11),
            order("UJ-2026-010", "Laura Fernández", "Cadena oro", "Bulgari", ("Media", 2), 10),
            order("UJ-2026-009", "Miguel Torres", "Reloj Patek", "Patek Philippe", ("Alta", 3), 9),
            order("UJ-2026-008", "Elena Vargas", "Aretes diamantes", "Harry Winston", ("Baja", 1), 8),
        ]
    }

    #[test]
    fn empty_filter_matches_everything() {
        let result = filter_and_sort(fixture(), &OrderFilter::default(), SortSpec::default());
        assert_eq!(result.len(), 8);
    }

    #[test]
    fn search_and_priority_filters_are_conjunctive() {
        let filter = OrderFilter {
            search: Some("cartier".into()),
            status_id: None,
            priority_id: Some(priority_id_for("Alta")),
        };
        let result = filter_and_sort(fixture(), &filter, SortSpec::default());
        let numbers: Vec<&str> = result.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["UJ-2026-011"]);
    }

    #[test]
    fn search_is_case_insensitive_over_all_text_fields() {
        let filter = OrderFilter {
            search: Some("RELOJ".into()),
            ..OrderFilter::default()
        };
        let result = filter_and_sort(fixture(), &filter, SortSpec::default());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn priority_sort_uses_rank_not_label() {
        let sort = SortSpec::new(SortColumn::Priority, SortDirection::Desc);
        let result = filter_and_sort(fixture(), &OrderFilter::default(), sort);
        let names: Vec<&str> = result.iter().map(|o| o.priority_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Alta", "Alta", "Alta", "Media", "Media", "Media", "Baja", "Baja"]
        );
        // Stable within ties: original relative order preserved.
        let altas: Vec<&str> = result
            .iter()
            .filter(|o| o.priority_name == "Alta")
            .map(|o| o.order_number.as_str())
            .collect();
        assert_eq!(altas, vec!["UJ-2026-015", "UJ-2026-011", "UJ-2026-009"]);
    }

    #[test]
    fn date_sort_is_chronological() {
        let sort = SortSpec::new(SortColumn::ReceivedDate, SortDirection::Asc);
        let result = filter_and_sort(fixture(), &OrderFilter::default(), sort);
        assert_eq!(result.first().unwrap().order_number, "UJ-2026-008");
        assert_eq!(result.last().unwrap().order_number, "UJ-2026-015");
    }

    #[test]
    fn toggling_same_column_twice_restores_order() {
        let sort = SortSpec::new(SortColumn::OrderNumber, SortDirection::Desc);
        let first = filter_and_sort(fixture(), &OrderFilter::default(), sort);

        let flipped = sort.toggle(SortColumn::OrderNumber);
        assert_eq!(flipped.direction, SortDirection::Asc);
        let restored = flipped.toggle(SortColumn::OrderNumber);
        assert_eq!(restored, sort);

        let again = filter_and_sort(fixture(), &OrderFilter::default(), restored);
        let a: Vec<&str> = first.iter().map(|o| o.order_number.as_str()).collect();
        let b: Vec<&str> = again.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn toggling_different_column_resets_to_descending() {
        let sort = SortSpec::new(SortColumn::OrderNumber, SortDirection::Asc);
        let next = sort.toggle(SortColumn::Priority);
        assert_eq!(next.column, SortColumn::Priority);
        assert_eq!(next.direction, SortDirection::Desc);
    }
}
