//! Background reader task.
//!
//! One loop per connection. It is the only reader of the socket: every
//! inbound frame passes through here, gets parsed, and is routed to the
//! caller waiting on its id. The loop ends when the peer closes, the
//! transport fails, or the local side aborts it during `close()`.

use std::sync::Arc;
use tracing::{debug, error, warn};

use strand_proto::RpcResponse;

use super::{ConnectionState, Frame, FrameSink, FrameSource, LinkState};
use crate::rpc::ResponseRouter;

pub(crate) async fn read_loop(
    mut source: Box<dyn FrameSource>,
    sink: Arc<dyn FrameSink>,
    router: Arc<ResponseRouter>,
    link: Arc<LinkState>,
) {
    loop {
        match source.next_frame().await {
            Ok(Some(Frame::Text(text))) => match serde_json::from_str::<RpcResponse>(&text) {
                Ok(response) => {
                    router.deliver(response);
                }
                // One bad frame must not kill the connection
                Err(e) => {
                    warn!(error = %e, "skipping unparseable frame");
                }
            },
            Ok(Some(Frame::Ping(payload))) => {
                if let Err(e) = sink.send_pong(payload).await {
                    debug!(error = %e, "pong failed");
                }
            }
            Ok(None) => {
                debug!("server closed the connection");
                break;
            }
            Err(e) => {
                // Expected while a deliberate close tears the socket down
                if link.state() != ConnectionState::Closing {
                    error!(error = %e, "transport failed, connection is dead");
                    link.record_failure(e.to_string());
                }
                break;
            }
        }
    }

    link.set(ConnectionState::Closed);
    let orphaned = router.drain();
    if orphaned > 0 {
        debug!(orphaned, "abandoned in-flight calls on shutdown");
    }
}
