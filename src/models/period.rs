// src/models/period.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;

// ---
// Period (O "Mês de Cobrança")
// ---
// Um par (ano, mês) que identifica um ciclo de cobrança.
// O construtor garante o mês em 1..=12 e o ano dentro da faixa suportada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
pub struct Period {
    #[schema(example = 2024)]
    year: i32,
    #[schema(example = 3)]
    month: i32,
}

pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 3000;

impl Period {
    /// Ano em `MIN_YEAR..=MAX_YEAR` e mês em 1..=12; assim `previous`/`next` nunca estouram.
    pub fn new(year: i32, month: i32) -> Result<Self, AppError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(AppError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> i32 {
        self.month
    }

    /// Mês anterior. Janeiro volta para dezembro do ano anterior.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Mês seguinte (usado só para navegação na apresentação).
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
