// src/services/billing_calculator.rs

use rust_decimal::Decimal;

use crate::models::{
    billing::{ComputedBill, MeterReadings, Usage},
    tenant::RateCard,
};

// Descontos fixos da fórmula legada. NÃO dependem das tarifas do inquilino.
const ELECTRICITY_FEE_OFFSET: Decimal = Decimal::from_parts(1, 0, 0, false, 0);
const WATER_FEE_OFFSET: Decimal = Decimal::from_parts(45, 0, 0, false, 1);

/// Consumo do período: diferença das leituras cumulativas, nunca negativa.
pub fn usage_between(current: MeterReadings, previous: MeterReadings) -> Usage {
    Usage {
        electricity: (current.electricity - previous.electricity).max(Decimal::ZERO),
        water: (current.water - previous.water).max(Decimal::ZERO),
    }
}

/// Calcula consumo, tarifas e total de um mês.
///
/// Fórmula legada, reproduzida exatamente:
///
/// ```text
/// electricityAmount = (electricityUsage + 1) * electricityRate
/// waterAmount       = (waterUsage + 1) * waterRate
/// electricityFee    = electricityAmount - 1
/// waterFee          = waterAmount - 4.5
/// total             = rent + electricityAmount + waterAmount
/// ```
///
/// Não entra em pânico: leituras abaixo do mês anterior viram consumo zero e
/// `None` só aparece quando algum valor não cabe em um `Decimal`.
pub fn compute_bill(current: MeterReadings, previous: MeterReadings, rates: &RateCard) -> Option<ComputedBill> {
    let usage = usage_between(current, previous);

    let electricity_amount = usage
        .electricity
        .checked_add(Decimal::ONE)?
        .checked_mul(rates.electricity_rate)?;
    let water_amount = usage
        .water
        .checked_add(Decimal::ONE)?
        .checked_mul(rates.water_rate)?;

    Some(ComputedBill {
        electricity_usage: usage.electricity,
        water_usage: usage.water,
        electricity_fee: electricity_amount.checked_sub(ELECTRICITY_FEE_OFFSET)?,
        water_fee: water_amount.checked_sub(WATER_FEE_OFFSET)?,
        total: Decimal::from(rates.rent)
            .checked_add(electricity_amount)?
            .checked_add(water_amount)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_rates() -> RateCard {
        RateCard {
            electricity_rate: dec!(1),
            water_rate: dec!(4.5),
            rent: 800,
        }
    }

    fn readings(electricity: Decimal, water: Decimal) -> MeterReadings {
        MeterReadings { electricity, water }
    }

    #[test]
    fn month_with_previous_reading() {
        let bill = compute_bill(readings(dec!(130), dec!(55)), readings(dec!(100), dec!(50)), &standard_rates()).unwrap();

        assert_eq!(bill.electricity_usage, dec!(30));
        assert_eq!(bill.water_usage, dec!(5));
        assert_eq!(bill.electricity_fee, dec!(30));
        assert_eq!(bill.water_fee, dec!(22.5));
        assert_eq!(bill.total, dec!(858));
    }

    #[test]
    fn first_month_counts_from_zero() {
        let bill = compute_bill(readings(dec!(10), dec!(2)), MeterReadings::default(), &standard_rates()).unwrap();

        assert_eq!(bill.electricity_usage, dec!(10));
        assert_eq!(bill.water_usage, dec!(2));
        assert_eq!(bill.total, dec!(824.5));
    }

    #[test]
    fn readings_below_previous_clamp_to_zero_usage() {
        let bill = compute_bill(readings(dec!(90), dec!(40)), readings(dec!(100), dec!(50)), &standard_rates()).unwrap();

        assert_eq!(bill.electricity_usage, Decimal::ZERO);
        assert_eq!(bill.water_usage, Decimal::ZERO);
        // Sem consumo ainda se cobra a primeira unidade de cada medidor
        assert_eq!(bill.total, dec!(805.5));
    }

    #[test]
    fn fee_offsets_do_not_follow_the_tenant_rates() {
        let rates = RateCard {
            electricity_rate: dec!(2),
            water_rate: dec!(3),
            rent: 500,
        };
        let bill = compute_bill(readings(dec!(10), dec!(4)), MeterReadings::default(), &rates).unwrap();

        // (10 + 1) * 2 - 1 e (4 + 1) * 3 - 4.5
        assert_eq!(bill.electricity_fee, dec!(21));
        assert_eq!(bill.water_fee, dec!(10.5));
        assert_eq!(bill.total, dec!(500) + dec!(22) + dec!(15));
    }

    #[test]
    fn total_matches_formula_across_inputs() {
        let rates = RateCard {
            electricity_rate: dec!(0.85),
            water_rate: dec!(6.2),
            rent: 520,
        };
        for (cur_e, prev_e, cur_w, prev_w) in [
            (dec!(0), dec!(0), dec!(0), dec!(0)),
            (dec!(1234.5), dec!(1200), dec!(88), dec!(80.25)),
            (dec!(50), dec!(49), dec!(12), dec!(12)),
        ] {
            let bill = compute_bill(readings(cur_e, cur_w), readings(prev_e, prev_w), &rates).unwrap();
            let expected = dec!(520)
                + (cur_e - prev_e + dec!(1)) * rates.electricity_rate
                + (cur_w - prev_w + dec!(1)) * rates.water_rate;
            assert_eq!(bill.total, expected);
        }
    }

    #[test]
    fn same_inputs_same_output() {
        let a = compute_bill(readings(dec!(77), dec!(9)), readings(dec!(60), dec!(3)), &standard_rates()).unwrap();
        let b = compute_bill(readings(dec!(77), dec!(9)), readings(dec!(60), dec!(3)), &standard_rates()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn amounts_too_large_for_a_decimal_yield_none() {
        let rates = RateCard {
            electricity_rate: dec!(100000000000000000000),
            water_rate: dec!(4.5),
            rent: 800,
        };

        assert!(compute_bill(readings(dec!(10000000000), dec!(1)), MeterReadings::default(), &rates).is_none());
        assert!(compute_bill(readings(Decimal::MAX, dec!(1)), MeterReadings::default(), &standard_rates()).is_none());
    }

    #[test]
    fn usage_is_never_negative() {
        let usage = usage_between(readings(dec!(5), dec!(9)), readings(dec!(6), dec!(3)));
        assert_eq!(usage, Usage { electricity: dec!(0), water: dec!(6) });
    }
}
