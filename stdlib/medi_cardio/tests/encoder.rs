use medi_cardio::{encode, encode_label, Feature, PatientRecord, Presence, Sex, FEATURE_COUNT};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scenario_one() -> PatientRecord {
    PatientRecord {
        age: 50.0,
        anaemia: Presence::Absent,
        creatinine_phosphokinase: 200.0,
        diabetes: Presence::Absent,
        ejection_fraction: 35.0,
        high_blood_pressure: Presence::Absent,
        platelets: 250000.0,
        serum_creatinine: 1.1,
        serum_sodium: 137.0,
        sex: Sex::Male,
        smoking: Presence::Absent,
        time: 130.0,
    }
}

#[test]
fn scenario_male_non_smoker() {
    let v = encode(&scenario_one());
    assert_eq!(
        v.to_vec(),
        vec![50.0, 0.0, 200.0, 0.0, 35.0, 0.0, 250000.0, 1.1, 137.0, 1.0, 0.0, 130.0]
    );
}

#[test]
fn scenario_female_smoker() {
    let record = PatientRecord {
        sex: Sex::Female,
        smoking: Presence::Present,
        ..scenario_one()
    };
    assert_eq!(
        encode(&record).to_vec(),
        vec![50.0, 0.0, 200.0, 0.0, 35.0, 0.0, 250000.0, 1.1, 137.0, 0.0, 1.0, 130.0]
    );
}

#[test]
fn ejection_fraction_limits_pass_unchanged() {
    for ef in [10.0, 80.0] {
        let record = PatientRecord {
            ejection_fraction: ef,
            ..scenario_one()
        };
        assert_eq!(encode(&record)[Feature::EjectionFraction], ef);
    }
}

#[test]
fn out_of_domain_values_are_not_clamped() {
    let record = PatientRecord {
        platelets: -5.0,
        age: 130.0,
        ..scenario_one()
    };
    let v = encode(&record);
    assert_eq!(v[Feature::Platelets], -5.0);
    assert_eq!(v[Feature::Age], 130.0);
}

#[test]
fn json_patient_encodes_like_typed_record() {
    let record: PatientRecord = serde_json::from_str(
        r#"{"age":50,"anaemia":"No","creatinine_phosphokinase":200,"diabetes":"No",
            "ejection_fraction":35,"high_blood_pressure":"No","platelets":250000.0,
            "serum_creatinine":1.1,"serum_sodium":137,"sex":"Male","smoking":"No","time":130}"#,
    )
    .expect("patient json");
    assert_eq!(encode(&record), encode(&scenario_one()));
}

fn presence() -> impl Strategy<Value = Presence> {
    any::<bool>().prop_map(Presence::from)
}

fn sex() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Male), Just(Sex::Female)]
}

prop_compose! {
    fn any_record()(
        age in 18.0f64..=100.0,
        anaemia in presence(),
        cpk in 0.0f64..8000.0,
        diabetes in presence(),
        ef in 10.0f64..=80.0,
        hbp in presence(),
        platelets in 0.0f64..900000.0,
        sc in 0.0f64..10.0,
        sodium in 100.0f64..=150.0,
        sex in sex(),
        smoking in presence(),
        time in 0.0f64..=300.0,
    ) -> PatientRecord {
        PatientRecord {
            age,
            anaemia,
            creatinine_phosphokinase: cpk,
            diabetes,
            ejection_fraction: ef,
            high_blood_pressure: hbp,
            platelets,
            serum_creatinine: sc,
            serum_sodium: sodium,
            sex,
            smoking,
            time,
        }
    }
}

proptest! {
    #[test]
    fn vector_has_twelve_columns_in_order(record in any_record()) {
        let v = encode(&record);
        prop_assert_eq!(v.as_slice().len(), FEATURE_COUNT);
        for feature in Feature::ALL {
            let expected = match feature {
                Feature::Anaemia => f64::from(record.anaemia.code()),
                Feature::Diabetes => f64::from(record.diabetes.code()),
                Feature::HighBloodPressure => f64::from(record.high_blood_pressure.code()),
                Feature::Sex => f64::from(record.sex.code()),
                Feature::Smoking => f64::from(record.smoking.code()),
                numeric => record.numeric(numeric).unwrap(),
            };
            prop_assert_eq!(v[feature], expected);
        }
    }

    #[test]
    fn unknown_labels_encode_to_zero(label in "\\PC*") {
        prop_assume!(label != "Yes" && label != "Male");
        prop_assert_eq!(encode_label(&label), 0);
    }

    #[test]
    fn encoding_is_deterministic(record in any_record()) {
        prop_assert_eq!(encode(&record), encode(&record.clone()));
    }
}
