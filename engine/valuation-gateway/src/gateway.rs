//! Main ValuationGateway implementation

use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

use valuation_engine::{ModelHandle, ValuationEngine};

use crate::config::GatewayConfig;
use crate::error::GatewayResult;
use crate::rest_api;

/// Read-only state shared by every request handler
#[derive(Debug, Default)]
pub struct GatewayState {
    engine: Option<ValuationEngine>,
}

impl GatewayState {
    pub fn new(engine: Option<ValuationEngine>) -> Self {
        Self { engine }
    }

    /// Load the configured model. A missing or corrupt artifact is logged and
    /// leaves the gateway running without a model.
    pub fn from_config(config: &GatewayConfig) -> Self {
        match ValuationEngine::from_config(&config.valuation) {
            Ok(engine) => {
                info!("✅ Model loaded successfully");
                Self::new(Some(engine))
            }
            Err(e) => {
                error!("🔴 Error loading model: {}", e);
                Self::new(None)
            }
        }
    }

    pub fn engine(&self) -> Option<&ValuationEngine> {
        self.engine.as_ref()
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.engine.as_ref().map(ValuationEngine::model)
    }

    pub fn model_loaded(&self) -> bool {
        self.engine.is_some()
    }
}

/// HTTP front end for the valuation engine
pub struct ValuationGateway {
    config: GatewayConfig,
    state: Arc<GatewayState>,
}

impl ValuationGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let state = Arc::new(GatewayState::from_config(&config));
        Self { config, state }
    }

    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Serve until `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> GatewayResult<()> {
        let addr = self.config.server_addr()?;
        let routes = rest_api::create_routes(self.state.clone(), self.config.server.max_body_bytes);

        let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
        info!("ValuationGateway listening on http://{}", bound);

        server.await;
        info!("ValuationGateway stopped");
        Ok(())
    }
}
