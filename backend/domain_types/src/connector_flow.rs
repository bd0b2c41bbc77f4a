/// Hosted checkout: an order is created and the shopper is sent to the payment page.
#[derive(Debug, Clone)]
pub struct RedirectCheckout;

/// Order creation step of a native checkout.
#[derive(Debug, Clone)]
pub struct CreateOrder;

/// Charges (or pre-authorizes) a tokenized card against a previously created order.
#[derive(Debug, Clone)]
pub struct CreateTransaction;

#[derive(Debug, Clone)]
pub struct Refund;

/// Lookup of one transaction, or of a filtered transaction list.
#[derive(Debug, Clone)]
pub struct FetchTransactions;
