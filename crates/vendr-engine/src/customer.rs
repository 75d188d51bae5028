//! Customer directory: plan-gated creation and owner-scoped listing.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use vendr_core::{new_entity_id, plan::PlanLimits, validation, Caller, Customer, PlanRegistry};
use vendr_store::Store;

use crate::engine::owner_scope;
use crate::error::{EngineError, EngineResult};

/// Fields for a new customer record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub name: String,
    pub email: Option<String>,
}

pub struct CustomerService {
    store: Arc<dyn Store>,
    plans: Arc<PlanRegistry>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>, plans: Arc<PlanRegistry>) -> Self {
        CustomerService { store, plans }
    }

    /// Customers visible to the caller: all for admins, own otherwise.
    pub async fn list(&self, caller: &Caller) -> EngineResult<Vec<Customer>> {
        Ok(self.store.list_customers(owner_scope(caller)).await?)
    }

    /// Creates a customer owned by the caller, enforcing the caller's plan
    /// customer cap.
    pub async fn create(&self, caller: &Caller, req: CreateCustomer) -> EngineResult<Customer> {
        validation::validate_name(&req.name)?;

        let plan = self.plans.get(caller.plan);
        let owned = self.store.list_customers(Some(&caller.id)).await?.len();
        if !PlanLimits::allows(plan.limits.customers, owned) {
            return Err(EngineError::LimitExceeded {
                resource: "customers",
                limit: plan.limits.customers.unwrap_or(0),
            });
        }

        let customer = Customer {
            id: new_entity_id(),
            owner_id: caller.id.clone(),
            name: req.name,
            email: req.email,
        };

        self.store.insert_customer(customer.clone()).await?;
        info!(id = %customer.id, owner = %customer.owner_id, "customer created");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use vendr_core::plan::{LimitsPatch, PlanId, PlanPatch};
    use vendr_store::MemoryStore;

    fn directory(registry: PlanRegistry) -> CustomerService {
        CustomerService::new(Arc::new(MemoryStore::new()), Arc::new(registry))
    }

    fn new_customer(name: &str) -> CreateCustomer {
        CreateCustomer {
            name: name.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn create_enforces_customer_cap() {
        let registry = PlanRegistry::with_defaults();
        registry.update(
            PlanId::Gratis,
            PlanPatch {
                limits: Some(LimitsPatch {
                    products: None,
                    customers: Some(Some(1)),
                }),
                ..Default::default()
            },
        );
        let customers = directory(registry);
        let alice = Caller::user("alice", PlanId::Gratis);

        customers.create(&alice, new_customer("c1")).await.unwrap();
        let err = customers
            .create(&alice, new_customer("c2"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::LimitExceeded {
                resource: "customers",
                limit: 1,
            }
        ));
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let customers = directory(PlanRegistry::with_defaults());
        let alice = Caller::user("alice", PlanId::Gratis);

        let err = customers
            .create(&alice, new_customer("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn listing_is_owner_scoped() {
        let customers = directory(PlanRegistry::with_defaults());
        let alice = Caller::user("alice", PlanId::Gratis);
        let bob = Caller::user("bob", PlanId::Gratis);

        customers.create(&alice, new_customer("hers")).await.unwrap();
        customers.create(&bob, new_customer("his")).await.unwrap();

        assert_eq!(customers.list(&alice).await.unwrap().len(), 1);
        assert_eq!(customers.list(&bob).await.unwrap().len(), 1);
        assert_eq!(
            customers.list(&Caller::admin("root")).await.unwrap().len(),
            2
        );
    }
}
