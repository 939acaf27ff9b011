use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// PaymentIntent
///
/// The slice of the provider's intent object the API needs: the client secret
/// the frontend hands to Stripe.js to confirm the payment.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// PaymentService
///
/// Abstract contract for the payment collaborator. The real client
/// (StripeClient) talks to Stripe over HTTPS; the mock stands in during
/// testing so handler logic can be exercised without network access or a
/// provider account.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Creates a payment intent for `amount` in the smallest currency unit
    /// (cents for USD), restricted to the given payment method types.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        methods: &[&str],
    ) -> Result<PaymentIntent, String>;
}

/// Wire shape of the provider's intent response; only the secret is read.
#[derive(Deserialize)]
struct StripeIntentResponse {
    client_secret: String,
}

/// StripeClient
///
/// The concrete implementation calling the Stripe REST API. Stripe takes
/// form-encoded bodies and authenticates with the secret key as a bearer
/// credential.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
            api_base: "https://api.stripe.com/v1".to_string(),
        }
    }
}

#[async_trait]
impl PaymentService for StripeClient {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        methods: &[&str],
    ) -> Result<PaymentIntent, String> {
        let mut form: Vec<(&str, String)> = vec![
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
        ];
        for method in methods {
            form.push(("payment_method_types[]", method.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("stripe returned {}", response.status()));
        }

        let intent = response
            .json::<StripeIntentResponse>()
            .await
            .map_err(|e| e.to_string())?;

        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}

/// MockPaymentService
///
/// Mock implementation used exclusively in tests. Returns a deterministic
/// client secret, or a simulated provider failure when `should_fail` is set.
#[derive(Clone)]
pub struct MockPaymentService {
    pub should_fail: bool,
}

impl MockPaymentService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockPaymentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentService for MockPaymentService {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        _methods: &[&str],
    ) -> Result<PaymentIntent, String> {
        if self.should_fail {
            return Err("Mock Payment Error: simulation requested".to_string());
        }
        Ok(PaymentIntent {
            client_secret: format!("pi_mock_secret_{}_{}", amount, currency),
        })
    }
}

/// PaymentState
///
/// The concrete type used to share the payment service across the application state.
pub type PaymentState = Arc<dyn PaymentService>;
