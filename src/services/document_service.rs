// src/services/document_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Element};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    middleware::i18n::Lang,
    models::{
        billing::{InvoiceView, RecordFilter, RecordRow},
        period::Period,
    },
};

// ---
// Rótulos da fatura por idioma
// ---
struct InvoiceLabels {
    title: &'static str,
    period: &'static str,
    room: &'static str,
    rent: &'static str,
    total: &'static str,
    details: &'static str,
    electricity: &'static str,
    water: &'static str,
    previous_reading: &'static str,
    current_reading: &'static str,
    usage: &'static str,
    fee: &'static str,
    no_record: &'static str,
}

fn labels(lang: Lang) -> InvoiceLabels {
    match lang {
        Lang::Zh => InvoiceLabels {
            title: "租金单",
            period: "账期",
            room: "房号",
            rent: "房租",
            total: "本月合计",
            details: "水电明细",
            electricity: "电表",
            water: "水表",
            previous_reading: "上月读数",
            current_reading: "本月读数",
            usage: "用量",
            fee: "费用",
            no_record: "当前月份没有记录，请先录入读数。",
        },
        Lang::Pt => InvoiceLabels {
            title: "Fatura de Aluguel",
            period: "Período",
            room: "Quarto",
            rent: "Aluguel",
            total: "Total do mês",
            details: "Luz e água",
            electricity: "Luz",
            water: "Água",
            previous_reading: "Leitura anterior",
            current_reading: "Leitura atual",
            usage: "Consumo",
            fee: "Valor",
            no_record: "Não há registro para este mês. Lance as leituras primeiro.",
        },
        Lang::En => InvoiceLabels {
            title: "Rent Invoice",
            period: "Billing period",
            room: "Room",
            rent: "Rent",
            total: "Total this month",
            details: "Utilities",
            electricity: "Electricity",
            water: "Water",
            previous_reading: "Previous reading",
            current_reading: "Current reading",
            usage: "Usage",
            fee: "Fee",
            no_record: "No record for this period yet. Save the meter readings first.",
        },
    }
}

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

// ---
// CSV
// ---
pub const CSV_HEADER: [&str; 8] = [
    "room",
    "year",
    "month",
    "electricity",
    "water",
    "electricityFee",
    "waterFee",
    "total",
];

/// Aspas só quando o campo tem vírgula, aspas ou quebra de linha; aspas internas dobram.
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Nome do arquivo: history_<tenant>_<ano>_<mês>.csv
pub fn csv_filename(filter: &RecordFilter) -> String {
    let tenant = filter
        .tenant_id
        .map(|id| format!("tenant_{id}"))
        .unwrap_or_else(|| "allTenants".to_string());
    let year = filter
        .year
        .map(|y| format!("y{y}"))
        .unwrap_or_else(|| "allYears".to_string());
    let month = filter
        .month
        .map(|m| format!("m{m:02}"))
        .unwrap_or_else(|| "allMonths".to_string());

    format!("history_{tenant}_{year}_{month}.csv")
}

/// Nome do PDF, só com caracteres seguros para o Content-Disposition.
pub fn invoice_filename(room: &str, period: Period) -> String {
    let room: String = room
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("invoice_{room}_{period}.pdf")
}

fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    font_family: String,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
        }
    }

    /// Histórico em CSV (mesma ordem do GET /records).
    pub fn records_csv(&self, rows: &[RecordRow]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(CSV_HEADER.join(","));

        for r in rows {
            let fields = [
                csv_escape(&r.room),
                r.year.to_string(),
                r.month.to_string(),
                plain(r.electricity),
                plain(r.water),
                plain(r.electricity_fee),
                plain(r.water_fee),
                format!("{:.2}", r.total),
            ];
            lines.push(fields.join(","));
        }

        lines.join("\n")
    }

    /// Renderiza a fatura de um mês em PDF (em memória).
    /// Só reexibe valores já calculados; nenhuma regra de cobrança é refeita aqui.
    pub fn invoice_pdf(&self, view: &InvoiceView, period: Period, lang: Lang) -> Result<Vec<u8>, AppError> {
        let l = labels(lang);

        // 1. Configura o PDF
        // Carrega a fonte da pasta configurada (CJK precisa de uma fonte com os glifos)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None).map_err(|_| {
            AppError::FontNotFound(format!("{}/{}", self.fonts_dir.display(), self.font_family))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} {} {}", l.title, view.tenant.room, period));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(l.title).styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Paragraph::new(format!("{}: {}", l.period, period)));
        doc.push(elements::Paragraph::new(format!("{}: {}", l.room, view.tenant.room)));
        doc.push(elements::Break::new(1.5));

        let Some(record) = &view.record else {
            doc.push(elements::Paragraph::new(l.no_record).styled(style::Style::new().italic()));
            let mut buffer = Vec::new();
            doc.render(&mut buffer).map_err(pdf_error)?;
            return Ok(buffer);
        };

        // --- ALUGUEL E TOTAL ---
        let style_bold = style::Style::new().bold();
        let mut summary = elements::TableLayout::new(vec![1, 1]);
        summary.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        summary
            .row()
            .element(elements::Paragraph::new(l.rent).styled(style_bold))
            .element(elements::Paragraph::new(l.total).styled(style_bold))
            .push()
            .map_err(pdf_error)?;
        summary
            .row()
            .element(elements::Paragraph::new(view.tenant.rent.to_string()))
            .element(elements::Paragraph::new(format!("{:.2}", record.total)))
            .push()
            .map_err(pdf_error)?;
        doc.push(summary);
        doc.push(elements::Break::new(1.5));

        // --- LUZ E ÁGUA ---
        doc.push(elements::Paragraph::new(l.details).styled(style::Style::new().bold().with_font_size(12)));
        let previous = view.previous.as_ref().map(|p| p.readings()).unwrap_or_default();

        let mut meters = elements::TableLayout::new(vec![2, 1, 1, 1, 1]);
        meters.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
        meters
            .row()
            .element(elements::Paragraph::new("").styled(style_bold))
            .element(elements::Paragraph::new(l.previous_reading).styled(style_bold))
            .element(elements::Paragraph::new(l.current_reading).styled(style_bold))
            .element(elements::Paragraph::new(l.usage).styled(style_bold))
            .element(elements::Paragraph::new(l.fee).styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for (label, prev, current, usage, fee) in [
            (l.electricity, previous.electricity, record.electricity, view.usage.electricity, record.electricity_fee),
            (l.water, previous.water, record.water, view.usage.water, record.water_fee),
        ] {
            meters
                .row()
                .element(elements::Paragraph::new(label))
                .element(elements::Paragraph::new(format!("{:.0}", prev)))
                .element(elements::Paragraph::new(format!("{:.0}", current)))
                .element(elements::Paragraph::new(format!("{:.0}", usage)))
                .element(elements::Paragraph::new(format!("{:.2}", fee)))
                .push()
                .map_err(pdf_error)?;
        }
        doc.push(meters);

        // 2. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{billing::Usage, tenant::Tenant};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn row(room: &str, total: Decimal) -> RecordRow {
        let now = Utc::now();
        RecordRow {
            id: 1,
            tenant_id: 1,
            room: room.into(),
            name: room.into(),
            rent: 800,
            electricity_rate: dec!(1),
            water_rate: dec!(4.5),
            year: 2024,
            month: 3,
            electricity: dec!(130),
            water: dec!(55),
            electricity_fee: dec!(30.00),
            water_fee: dec!(22.5),
            total,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn csv_escapes_only_when_needed() {
        assert_eq!(csv_escape("102"), "102");
        assert_eq!(csv_escape("A,1"), "\"A,1\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn csv_has_header_and_fixed_total_precision() {
        let svc = DocumentService::new("./fonts", "Roboto");
        let csv = svc.records_csv(&[row("102", dec!(858)), row("Suite, 2", dec!(824.5))]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "room,year,month,electricity,water,electricityFee,waterFee,total");
        assert_eq!(lines[1], "102,2024,3,130,55,30,22.5,858.00");
        assert_eq!(lines[2], "\"Suite, 2\",2024,3,130,55,30,22.5,824.50");
    }

    #[test]
    fn csv_filename_reflects_filters() {
        assert_eq!(csv_filename(&RecordFilter::default()), "history_allTenants_allYears_allMonths.csv");
        assert_eq!(
            csv_filename(&RecordFilter { tenant_id: Some(4), year: Some(2024), month: Some(3) }),
            "history_tenant_4_y2024_m03.csv"
        );
    }

    #[test]
    fn invoice_filename_is_header_safe() {
        let period = Period::new(2024, 3).unwrap();
        assert_eq!(invoice_filename("102", period), "invoice_102_2024-03.pdf");
        assert_eq!(invoice_filename("A \"1\"", period), "invoice_A__1__2024-03.pdf");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let svc = DocumentService::new("/nonexistent/fonts", "Roboto");
        let view = InvoiceView {
            tenant: Tenant {
                id: 1,
                room: "102".into(),
                name: "102".into(),
                electricity_rate: dec!(1),
                water_rate: dec!(4.5),
                rent: 800,
                created_at: Utc::now(),
            },
            record: None,
            previous: None,
            usage: Usage::default(),
        };

        let err = svc.invoice_pdf(&view, Period::new(2024, 3).unwrap(), Lang::En).unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
