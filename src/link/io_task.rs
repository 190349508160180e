//! Async I/O thread: transport on one side, link queues on the other.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! scheduling and `async-io-mini` for reactor-driven timers. Two
//! concurrent futures:
//!
//! 1. **Read** polls the transport every `io_poll_interval_ms` and hands
//!    frames to the [`InboundRouter`]
//! 2. **Write** awaits the outbound queue and wakes as soon as the tick
//!    loop pushes a frame
//!
//! ```text
//!  ┌───────────────────────────────────────────────────┐
//!  │  I/O Thread                                       │
//!  │  ┌─────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor               │  │
//!  │  │  ┌────────────┐      ┌──────────────────┐   │  │
//!  │  │  │ Read       │      │ Write (async)    │   │  │
//!  │  │  │ poll ⏱     │      │ wake-on-send     │   │  │
//!  │  │  └────────────┘      └──────────────────┘   │  │
//!  │  └─────────────────────────────────────────────┘  │
//!  │  runs until LinkChannels::request_shutdown        │
//!  └───────────────────────────────────────────────────┘
//! ```

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use log::{debug, info, warn};

use crate::error::LinkError;

use super::channels::LinkChannels;
use super::router::InboundRouter;
use super::transport::{FrameTransport, LinkEvent};

const IO_STACK_SIZE: usize = 64 * 1024;

type Shared<T> = Rc<RefCell<T>>;

/// Handle one transport event.
fn handle_event(router: &InboundRouter, event: LinkEvent) {
    match event {
        LinkEvent::Frame {
            peer,
            channel,
            payload,
        } => {
            if let Err(e) = router.on_frame(peer, channel, &payload) {
                debug!("IO: frame from {} on channel {} ignored: {}", peer, channel.0, e);
            }
        }
        LinkEvent::Disconnected(peer) => {
            info!("IO: {} disconnected", peer);
            router.on_disconnect(peer);
        }
    }
}

/// Read task: drain every pending transport event, then sleep one poll
/// interval on the reactor so the write task can run.
async fn read_loop<T: FrameTransport>(transport: Shared<T>, router: InboundRouter, poll: Duration) {
    loop {
        loop {
            // Borrow ends before the event is routed.
            let event = transport.borrow_mut().poll_event();
            match event {
                Some(event) => handle_event(&router, event),
                None => break,
            }
        }
        async_io_mini::Timer::after(poll).await;
    }
}

/// Write task: wakes when the tick loop pushes onto the outbound queue.
async fn write_loop<T: FrameTransport>(transport: Shared<T>, router: InboundRouter) {
    loop {
        let frame = router.link().recv_outbound().await;
        let result = transport.borrow_mut().write_frame(&frame);
        match result {
            Ok(()) => {}
            Err(LinkError::Disconnected) => {
                info!("IO: {} gone during write", frame.peer);
                router.on_disconnect(frame.peer);
            }
            Err(e) => warn!("IO: write to {} failed: {}", frame.peer, e),
        }
    }
}

/// Body of the I/O thread. Returns once shutdown is requested.
pub fn run_io_loop<T: FrameTransport>(
    transport: T,
    link: Arc<LinkChannels>,
    poll_interval_ms: u32,
) {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    let transport: Shared<T> = Rc::new(RefCell::new(transport));
    let router = InboundRouter::new(link.clone());
    let poll = Duration::from_millis(u64::from(poll_interval_ms.max(1)));

    executor
        .spawn(read_loop(transport.clone(), router.clone(), poll))
        .detach();
    executor.spawn(write_loop(transport, router)).detach();

    info!("IO task started (poll every {:?})", poll);

    futures_lite::future::block_on(executor.run(link.wait_shutdown()));

    info!("IO task stopped");
}

/// Spawn the I/O thread.
///
/// Takes ownership of the transport. The thread stops after
/// [`LinkChannels::request_shutdown`]; join the handle to wait for it.
pub fn spawn<T>(
    transport: T,
    link: Arc<LinkChannels>,
    poll_interval_ms: u32,
) -> anyhow::Result<JoinHandle<()>>
where
    T: FrameTransport + Send + 'static,
{
    std::thread::Builder::new()
        .name("simpit-io".into())
        .stack_size(IO_STACK_SIZE)
        .spawn(move || run_io_loop(transport, link, poll_interval_ms))
        .context("failed to spawn simpit I/O thread")
}
