//! Unary `Echo` handler.

use tonic::{Request, Response, Status};
use tracing::instrument;

use crate::grpc::proto::echo_server::Echo;
use crate::grpc::proto::{EchoRequest, EchoResponse};
use crate::observability::metrics;

/// Returns the request message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoService;

#[tonic::async_trait]
impl Echo for EchoService {
    #[instrument(skip_all, fields(remote_addr = ?request.remote_addr()))]
    async fn echo(&self, request: Request<EchoRequest>) -> Result<Response<EchoResponse>, Status> {
        let message = request.into_inner().message;
        tracing::info!(message = %message, "Echo");
        metrics::record_grpc_call("Echo");
        Ok(Response::new(EchoResponse { message }))
    }
}
