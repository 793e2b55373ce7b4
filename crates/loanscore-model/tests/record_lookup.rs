use loanscore_model::{FieldSpec, RawRecord, RawValue};
use proptest::prelude::*;

fn mixed_case(name: &str, mask: &[bool]) -> String {
    name.chars()
        .zip(mask.iter().cycle())
        .map(|(ch, upper)| {
            if *upper {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn any_casing_of_a_field_name_is_found(
        field_index in 0usize..13,
        mask in proptest::collection::vec(any::<bool>(), 1..8),
        value in -1.0e6f64..1.0e6,
    ) {
        let field = FieldSpec::ALL[field_index];
        let column = mixed_case(field.name(), &mask);
        let record = RawRecord::from_pairs([(column.as_str(), RawValue::from(value))]);
        prop_assert_eq!(record.get_ignore_case(field.name()), Some(&RawValue::Number(value)));
        prop_assert_eq!(FieldSpec::from_name(&column), Some(field));
    }
}

#[test]
fn record_roundtrips_through_json() {
    let record = RawRecord::from_pairs([
        ("Name", RawValue::from("Nguyen Van A")),
        ("person_age", RawValue::from(31.0)),
        ("previous_loan_defaults_on_file", RawValue::from("No")),
        ("loan_int_rate", RawValue::Missing),
    ]);
    let json = serde_json::to_string(&record).expect("serialize record");
    assert_eq!(
        json,
        r#"{"Name":"Nguyen Van A","person_age":31.0,"previous_loan_defaults_on_file":"No","loan_int_rate":null}"#
    );
    let back: RawRecord = serde_json::from_str(&json).expect("deserialize record");
    assert_eq!(back, record);
}
