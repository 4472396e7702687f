//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the billing tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod custom_order;
pub mod custom_order_item;
pub mod custom_order_payment;
pub mod customer;
pub mod invoice;
pub mod invoice_item;
pub mod invoice_payment;
pub mod receipt;
pub mod staff;

// Re-export specific types to avoid conflicts
pub use custom_order::{Entity as CustomOrder, Model as CustomOrderModel};
pub use custom_order_item::{Entity as CustomOrderItem, Model as CustomOrderItemModel};
pub use custom_order_payment::{
    Entity as CustomOrderPayment, Model as CustomOrderPaymentModel, OrderPaymentMethod,
};
pub use customer::{Entity as Customer, Model as CustomerModel};
pub use invoice::{Entity as Invoice, InvoiceStatus, Model as InvoiceModel};
pub use invoice_item::{Entity as InvoiceItem, Model as InvoiceItemModel};
pub use invoice_payment::{
    Entity as InvoicePayment, InvoicePaymentMethod, Model as InvoicePaymentModel,
};
pub use receipt::{Entity as Receipt, Model as ReceiptModel};
pub use staff::{Entity as Staff, Model as StaffModel};
