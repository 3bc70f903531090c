use crate::domain::load::Load;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentAggregate {
    pub equipment: String,
    pub count: u64,
    #[serde(rename = "avgRate")]
    pub avg_rate: u64,
}

/// Groups loads by equipment category in first-seen order, with the load count and the
/// rounded mean rate of each group.
pub fn aggregate_by_equipment(loads: &[Load]) -> Vec<EquipmentAggregate> {
    let mut groups: IndexMap<&str, (u64, f64)> = IndexMap::new();
    for load in loads {
        let (count, total) = groups.entry(load.equipment_category()).or_default();
        *count += 1;
        *total += load.loadboard_rate.or_zero();
    }

    // Groups only exist once a load was seen, so count >= 1.
    groups
        .into_iter()
        .map(|(equipment, (count, total))| EquipmentAggregate {
            equipment: equipment.to_string(),
            count,
            avg_rate: (total / count as f64).round() as u64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::numeric::LooseNumber;

    fn load(equipment: Option<&str>, rate: LooseNumber) -> Load {
        Load {
            equipment_type: equipment.map(str::to_string),
            loadboard_rate: rate,
            ..Load::default()
        }
    }

    #[test]
    fn single_load_yields_its_own_rate() {
        let out = aggregate_by_equipment(&[load(Some("Dry Van"), LooseNumber::new(1200.0))]);
        assert_eq!(
            out,
            vec![EquipmentAggregate {
                equipment: "Dry Van".to_string(),
                count: 1,
                avg_rate: 1200,
            }]
        );
    }

    #[test]
    fn groups_in_first_seen_order_and_rounds_average() {
        let loads = [
            load(Some("Reefer"), LooseNumber::new(1000.0)),
            load(Some("Dry Van"), LooseNumber::new(900.0)),
            load(Some("Reefer"), LooseNumber::new(1001.0)),
            load(Some("Flatbed"), LooseNumber::new(2500.0)),
        ];
        let out = aggregate_by_equipment(&loads);
        let names: Vec<_> = out.iter().map(|a| a.equipment.as_str()).collect();
        assert_eq!(names, ["Reefer", "Dry Van", "Flatbed"]);
        assert_eq!(out[0].count, 2);
        // 2001 / 2 = 1000.5 rounds up.
        assert_eq!(out[0].avg_rate, 1001);
    }

    #[test]
    fn missing_equipment_and_rate_fall_back() {
        let loads = [
            load(None, LooseNumber::absent()),
            load(Some(""), LooseNumber::new(600.0)),
        ];
        let out = aggregate_by_equipment(&loads);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].equipment, "Unknown");
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].avg_rate, 300);
    }

    #[test]
    fn counts_sum_to_number_of_loads() {
        let loads: Vec<_> = (0..37)
            .map(|i| {
                let equipment = ["Dry Van", "Reefer", "Flatbed", "Power Only"][i % 4];
                load(Some(equipment), LooseNumber::new((i * 113) as f64))
            })
            .collect();
        let total: u64 = aggregate_by_equipment(&loads).iter().map(|a| a.count).sum();
        assert_eq!(total, loads.len() as u64);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(aggregate_by_equipment(&[]).is_empty());
    }

    #[test]
    fn serializes_average_as_avg_rate() {
        let out = aggregate_by_equipment(&[load(Some("Reefer"), LooseNumber::new(10.0))]);
        let v = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(v, serde_json::json!({"equipment": "Reefer", "count": 1, "avgRate": 10}));
    }
}
