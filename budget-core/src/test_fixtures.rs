//! 2024 tax data subset shared by unit tests.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{FederalSchedule, FicaConfig, StateTaxConfig, TaxBracket, TaxTables};

fn brackets(rows: &[(Decimal, Option<Decimal>, Decimal)]) -> Vec<TaxBracket> {
    rows.iter()
        .map(|(min, max, rate)| TaxBracket::new(*min, *max, *rate))
        .collect()
}

pub fn single_2024() -> FederalSchedule {
    FederalSchedule {
        standard_deduction: dec!(14600),
        brackets: brackets(&[
            (dec!(0), Some(dec!(11600)), dec!(0.10)),
            (dec!(11600), Some(dec!(47150)), dec!(0.12)),
            (dec!(47150), Some(dec!(100525)), dec!(0.22)),
            (dec!(100525), Some(dec!(191950)), dec!(0.24)),
            (dec!(191950), Some(dec!(243725)), dec!(0.32)),
            (dec!(243725), Some(dec!(609350)), dec!(0.35)),
            (dec!(609350), None, dec!(0.37)),
        ]),
    }
}

pub fn married_jointly_2024() -> FederalSchedule {
    FederalSchedule {
        standard_deduction: dec!(29200),
        brackets: brackets(&[
            (dec!(0), Some(dec!(23200)), dec!(0.10)),
            (dec!(23200), Some(dec!(94300)), dec!(0.12)),
            (dec!(94300), Some(dec!(201050)), dec!(0.22)),
            (dec!(201050), Some(dec!(383900)), dec!(0.24)),
            (dec!(383900), Some(dec!(487450)), dec!(0.32)),
            (dec!(487450), Some(dec!(731200)), dec!(0.35)),
            (dec!(731200), None, dec!(0.37)),
        ]),
    }
}

pub fn fica_2024() -> FicaConfig {
    FicaConfig {
        social_security_rate: dec!(0.062),
        social_security_wage_base: dec!(168600),
        medicare_rate: dec!(0.0145),
        additional_medicare_rate: dec!(0.009),
        additional_medicare_threshold_single: dec!(200000),
        additional_medicare_threshold_married_jointly: dec!(250000),
    }
}

pub fn tables_2024() -> TaxTables {
    let mut states = BTreeMap::new();
    for code in ["FL", "TX", "WA"] {
        states.insert(code.to_string(), StateTaxConfig::None);
    }
    states.insert("AZ".to_string(), StateTaxConfig::Flat { rate: dec!(0.025) });
    states.insert("IL".to_string(), StateTaxConfig::Flat { rate: dec!(0.0495) });
    states.insert(
        "CA".to_string(),
        StateTaxConfig::Progressive {
            brackets: brackets(&[
                (dec!(0), Some(dec!(10736)), dec!(0.01)),
                (dec!(10736), Some(dec!(25450)), dec!(0.02)),
                (dec!(25450), Some(dec!(40250)), dec!(0.04)),
                (dec!(40250), Some(dec!(56200)), dec!(0.06)),
                (dec!(56200), Some(dec!(70200)), dec!(0.08)),
                (dec!(70200), Some(dec!(368690)), dec!(0.093)),
                (dec!(368690), Some(dec!(442500)), dec!(0.103)),
                (dec!(442500), Some(dec!(737800)), dec!(0.113)),
                (dec!(737800), None, dec!(0.123)),
            ]),
        },
    );
    states.insert(
        "MS".to_string(),
        StateTaxConfig::Progressive {
            brackets: brackets(&[
                (dec!(0), Some(dec!(10000)), dec!(0)),
                (dec!(10000), None, dec!(0.05)),
            ]),
        },
    );
    states.insert(
        "ND".to_string(),
        StateTaxConfig::Progressive {
            brackets: brackets(&[
                (dec!(0), Some(dec!(44225)), dec!(0)),
                (dec!(44225), None, dec!(0.02)),
            ]),
        },
    );

    TaxTables::new(2024, single_2024(), married_jointly_2024(), states, fica_2024())
        .expect("fixture tables are valid")
}
