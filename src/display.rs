use chrono::{DateTime, Utc};

/// Presentation hints for a registry entry. Purely cosmetic: unknown names
/// fall back to `DEFAULT_APPEARANCE`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub color: &'static str,
    pub icon: &'static str,
}

pub const DEFAULT_APPEARANCE: Appearance = Appearance {
    color: "gray",
    icon: "tag",
};

pub fn status_appearance(name: &str) -> Appearance {
    match name {
        "En Diagnóstico" => Appearance {
            color: "blue",
            icon: "magnifier",
        },
        "En espera de aprobación por cliente" => Appearance {
            color: "yellow",
            icon: "clock",
        },
        "En servicio" => Appearance {
            color: "orange",
            icon: "gear",
        },
        "Pieza lista para entrega" => Appearance {
            color: "green",
            icon: "check",
        },
        _ => DEFAULT_APPEARANCE,
    }
}

pub fn priority_appearance(name: &str) -> Appearance {
    match name {
        "Alta" => Appearance {
            color: "red",
            icon: "arrow-up",
        },
        "Media" => Appearance {
            color: "yellow",
            icon: "minus",
        },
        "Baja" => Appearance {
            color: "green",
            icon: "arrow-down",
        },
        _ => DEFAULT_APPEARANCE,
    }
}

/// Human-relative age of a record, in the workshop's wording.
pub fn time_since(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(from);
    let seconds = elapsed.num_seconds();
    if seconds < 60 {
        return "hace unos segundos".to_string();
    }
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return plural(minutes, "minuto", "minutos");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hora", "horas");
    }
    plural(elapsed.num_days(), "día", "días")
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

fn plural(count: i64, singular: &str, many: &str) -> String {
    if count == 1 {
        format!("hace 1 {singular}")
    } else {
        format!("hace {count} {many}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unknown_names_get_the_default_appearance() {
        assert_eq!(status_appearance("Recibido"), DEFAULT_APPEARANCE);
        assert_eq!(priority_appearance("Urgente"), DEFAULT_APPEARANCE);
    }

    #[test]
    fn known_names_are_mapped() {
        assert_eq!(status_appearance("En servicio").color, "orange");
        assert_eq!(priority_appearance("Alta").color, "red");
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let cases = [
            (now - chrono::Duration::seconds(30), "hace unos segundos"),
            (now - chrono::Duration::minutes(1), "hace 1 minuto"),
            (now - chrono::Duration::minutes(45), "hace 45 minutos"),
            (now - chrono::Duration::hours(3), "hace 3 horas"),
            (now - chrono::Duration::days(1), "hace 1 día"),
            (now - chrono::Duration::days(12), "hace 12 días"),
        ];
        for (from, expected) in cases {
            assert_eq!(time_since(from, now), expected);
        }
    }

    #[test]
    fn timestamp_display_format() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 14, 11, 15, 0).unwrap();
        assert_eq!(format_timestamp(ts), "14/01/2026 11:15");
    }
}
