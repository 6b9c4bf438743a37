use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Creates the handle/signal pair wiring a tonic `serve_with_shutdown` call
/// to drop-based teardown.
pub fn shutdown_signal() -> (RpcServerShutdownHandle, RpcServerShutdownSignal) {
    let (tx, rx) = oneshot::channel();

    (RpcServerShutdownHandle { _tx: tx }, RpcServerShutdownSignal { rx })
}

/// Dropping the handle shuts the paired RPC server down.
pub struct RpcServerShutdownHandle {
    _tx: oneshot::Sender<()>,
}

/// Future handed to the RPC server; resolves once the handle is gone.
pub struct RpcServerShutdownSignal {
    rx: oneshot::Receiver<()>,
}

impl Future for RpcServerShutdownSignal {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A value and a closed channel both mean the same thing here: the
        // holder of the handle is done with this server.
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(_) => Poll::Ready(()),
        }
    }
}
