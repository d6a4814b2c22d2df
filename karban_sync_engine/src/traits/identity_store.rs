use crate::{
    db_types::{AttemptContext, CanonicalAddress, Customer, IdentityMarkers, NewCustomer, TaxIdentity},
    traits::StoreError,
};

/// Customer and address persistence.
#[allow(async_fn_in_trait)]
pub trait IdentityStore {
    /// Finds the customer whose stored identity markers equal `markers`. Both the address JSON and the customer code
    /// must match.
    async fn find_customer(&self, markers: &IdentityMarkers) -> Result<Option<Customer>, StoreError>;

    async fn persist_customer(&self, customer: NewCustomer, ctx: &AttemptContext) -> Result<Customer, StoreError>;

    /// Replaces the customer's tax identity and returns the updated record.
    async fn update_tax_identity(
        &self,
        customer_id: i64,
        identity: &TaxIdentity,
        ctx: &AttemptContext,
    ) -> Result<Customer, StoreError>;

    /// Stores the address and links it to the customer. Returns the id of the address record.
    async fn persist_address(
        &self,
        address: CanonicalAddress,
        customer_id: i64,
        ctx: &AttemptContext,
    ) -> Result<i64, StoreError>;
}
