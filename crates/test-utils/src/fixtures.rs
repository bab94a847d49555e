//! Common test fixtures for county-atlas tests.
//!
//! Small, hand-checked artifacts whose expected ranges and rankings can be
//! worked out on paper.

use serde_json::{json, Value};

use crate::generators::{boundary_collection, square_polygon};

/// The trailing metadata header shared by every fixture table.
pub const METADATA_COLUMNS: [&str; 6] = [
    "County",
    "State",
    "County_FIPS",
    "DiagnosedDiabetes(Percentage)",
    "Lat",
    "Lon",
];

/// Counties used across fixtures: (county, state, fips, lat, lon).
pub mod counties {
    pub const AUTAUGA: (&str, &str, &str, f64, f64) = ("Autauga", "AL", "01001", 32.5, -86.6);
    pub const BALDWIN: (&str, &str, &str, f64, f64) = ("Baldwin", "AL", "01003", 30.7, -87.7);
    pub const LOS_ANGELES: (&str, &str, &str, f64, f64) =
        ("Los Angeles", "CA", "06037", 34.3, -118.2);
    pub const ALAMEDA: (&str, &str, &str, f64, f64) = ("Alameda", "CA", "06001", 37.6, -121.9);
    pub const HARRIS: (&str, &str, &str, f64, f64) = ("Harris", "TX", "48201", 29.8, -95.4);
}

/// Build a split-orientation table from feature columns and per-row values.
///
/// `rows` pairs a county tuple with its outcome value and feature values.
pub fn table(
    features: &[&str],
    rows: &[((&str, &str, &str, f64, f64), f64, Vec<f64>)],
) -> Value {
    let mut columns: Vec<&str> = features.to_vec();
    columns.extend(METADATA_COLUMNS);

    let data: Vec<Value> = rows
        .iter()
        .map(|((county, state, fips, lat, lon), outcome, values)| {
            let mut row: Vec<Value> = values.iter().map(|v| json!(v)).collect();
            row.extend([
                json!(county),
                json!(state),
                json!(fips),
                json!(outcome),
                json!(lat),
                json!(lon),
            ]);
            Value::Array(row)
        })
        .collect();

    json!({ "columns": columns, "data": data })
}

/// The single-year worked example.
///
/// Year 2021, three counties, features `FoodInsecurity = [0.1, 0.4, 0.2]` and
/// `Poverty = [0.3, 0.3, 0.9]`. The attribution range is `(0.1, 0.9)`, the
/// column ranking is `Poverty (0.9)` then `FoodInsecurity (0.4)`, and Los
/// Angeles (row 3) carries the maximum.
pub fn example_2021_artifact() -> Value {
    use counties::*;
    let features = ["FoodInsecurity", "Poverty"];
    json!({
        "2021": {
            "shap_values": table(&features, &[
                (AUTAUGA, 9.1, vec![0.1, 0.3]),
                (BALDWIN, 8.7, vec![0.4, 0.3]),
                (LOS_ANGELES, 10.2, vec![0.2, 0.9]),
            ]),
            "processed_data": table(&features, &[
                (AUTAUGA, 9.1, vec![12.5, 15.2]),
                (BALDWIN, 8.7, vec![10.1, 10.8]),
                (LOS_ANGELES, 10.2, vec![15.3, 14.1]),
            ]),
        }
    })
}

/// Two years with different states and features, for cascade tests.
///
/// - `2021` (default): AL (Autauga, Baldwin) and CA (Los Angeles); features
///   `FoodInsecurity`, `Poverty`; no precomputed ranking.
/// - `2019`: AL (Autauga) and TX (Harris); features `Obesity`, `Poverty`;
///   precomputed top features per row.
pub fn cascade_artifact() -> Value {
    use counties::*;
    let features_2021 = ["FoodInsecurity", "Poverty"];
    let features_2019 = ["Obesity", "Poverty"];
    json!({
        "2021": {
            "shap_values": table(&features_2021, &[
                (AUTAUGA, 9.1, vec![0.1, 0.3]),
                (BALDWIN, 8.7, vec![0.4, 0.3]),
                (LOS_ANGELES, 10.2, vec![0.2, 0.9]),
            ]),
            "processed_data": table(&features_2021, &[
                (AUTAUGA, 9.1, vec![12.5, 15.2]),
                (BALDWIN, 8.7, vec![10.1, 10.8]),
                (LOS_ANGELES, 10.2, vec![15.3, 14.1]),
            ]),
        },
        "2019": {
            "shap_values": table(&features_2019, &[
                (HARRIS, 11.4, vec![0.7, -0.2]),
                (AUTAUGA, 9.8, vec![0.05, 0.6]),
            ]),
            "processed_data": table(&features_2019, &[
                (HARRIS, 11.4, vec![33.0, 16.4]),
                (AUTAUGA, 9.8, vec![36.1, 15.9]),
            ]),
            "top_features": [
                ["Obesity", "Poverty", "Unemployment", "Age65Plus", "FoodInsecurity", "Smoking"],
                ["Poverty", "Obesity"],
            ],
        }
    })
}

/// County boundaries covering every fixture county.
///
/// Alameda (06001) has a boundary but no data row; Harris (48201) has both.
pub fn county_boundaries() -> Value {
    use counties::*;
    boundary_collection(
        &[AUTAUGA, BALDWIN, LOS_ANGELES, ALAMEDA, HARRIS]
            .iter()
            .map(|(county, _, fips, lat, lon)| (*fips, *county, square_polygon(*lon, *lat, 0.5)))
            .collect::<Vec<_>>(),
    )
}

/// Boundaries missing Baldwin (01003), for hole-rendering tests.
pub fn county_boundaries_without_baldwin() -> Value {
    use counties::*;
    boundary_collection(
        &[AUTAUGA, LOS_ANGELES, ALAMEDA, HARRIS]
            .iter()
            .map(|(county, _, fips, lat, lon)| (*fips, *county, square_polygon(*lon, *lat, 0.5)))
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let t = table(&["A"], &[(counties::AUTAUGA, 9.0, vec![1.0])]);
        assert_eq!(t["columns"].as_array().unwrap().len(), 7);
        assert_eq!(t["data"][0].as_array().unwrap().len(), 7);
        assert_eq!(t["data"][0][3], json!("01001"));
    }

    #[test]
    fn test_cascade_year_order() {
        let artifact = cascade_artifact();
        let years: Vec<&str> = artifact
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(years, vec!["2021", "2019"]);
    }
}
