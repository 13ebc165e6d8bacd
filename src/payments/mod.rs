pub mod razorpay;

pub use razorpay::{
    normalize, NormalizedPayment, PaymentNotes, RazorpayPaymentEntity, RazorpayWebhookEvent,
    PAYMENT_CAPTURED,
};
