pub mod billing_calculator;
pub mod billing_service;
pub mod document_service;
pub mod invoice_service;
pub mod tenant_service;
