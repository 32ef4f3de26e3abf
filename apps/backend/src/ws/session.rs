//! Per-connection WebSocket session actor.
//!
//! Each session is pinned to one room. Commands arrive as tagged JSON,
//! are dispatched to the game-flow service, and rejections come back as
//! error frames; accepted mutations reach the session again through the
//! hub broadcast.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::table::RoomId;
use crate::error::AppError;
use crate::services::game_flow::GameFlowService;
use crate::session::ClientId;
use crate::ws::hub::{OutboundFrame, WsHub};
use crate::ws::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub struct WsSession {
    conn_id: Uuid,
    room_id: RoomId,
    client_id: ClientId,
    flow: Arc<GameFlowService>,
    hub: Arc<WsHub>,
    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    pub fn new(
        conn_id: Uuid,
        room_id: RoomId,
        client_id: ClientId,
        flow: Arc<GameFlowService>,
        hub: Arc<WsHub>,
    ) -> Self {
        Self {
            conn_id,
            room_id,
            client_id,
            flow,
            hub,
            last_heartbeat: Instant::now(),
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_app_error(ctx: &mut ws::WebsocketContext<Self>, err: &AppError) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code: err.code().as_str().to_string(),
                message: err.detail(),
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    room_id = %actor.room_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Run a room command and surface only rejections; accepted commands
    /// answer through the room broadcast.
    fn dispatch<F>(&self, ctx: &mut ws::WebsocketContext<Self>, fut: F)
    where
        F: std::future::Future<Output = Result<(), AppError>> + 'static,
    {
        ctx.spawn(fut.into_actor(self).map(|res, _actor, ctx| {
            if let Err(err) = res {
                Self::send_app_error(ctx, &err);
            }
        }));
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            room_id = %self.room_id,
            client_id = %self.client_id,
            "[WS SESSION] started"
        );

        let recipient = ctx.address().recipient::<OutboundFrame>();
        self.hub.register(self.room_id, self.conn_id, recipient);
        self.flow
            .mapper()
            .bind_transport(self.conn_id, self.client_id);

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.hub.unregister(self.room_id, self.conn_id);

        let flow = self.flow.clone();
        let (room_id, conn_id) = (self.room_id, self.conn_id);
        actix::spawn(async move {
            flow.mark_disconnected(room_id, conn_id).await;
        });

        info!(
            conn_id = %self.conn_id,
            room_id = %self.room_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    Self::send_json(
                        ctx,
                        &ServerMsg::Error {
                            code: "BAD_REQUEST".to_string(),
                            message: "Malformed JSON".to_string(),
                        },
                    );
                    return;
                };

                if let ClientMsg::Hello { protocol } = cmd {
                    if protocol != PROTOCOL_VERSION {
                        Self::send_json(
                            ctx,
                            &ServerMsg::Error {
                                code: "BAD_REQUEST".to_string(),
                                message: "Unsupported protocol version".to_string(),
                            },
                        );
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                        ctx.stop();
                        return;
                    }
                    self.hello_done = true;
                    Self::send_json(
                        ctx,
                        &ServerMsg::HelloAck {
                            protocol: PROTOCOL_VERSION,
                            client_id: self.client_id,
                        },
                    );
                    return;
                }

                if !self.hello_done {
                    Self::send_json(
                        ctx,
                        &ServerMsg::Error {
                            code: "BAD_REQUEST".to_string(),
                            message: "Must send hello first".to_string(),
                        },
                    );
                    return;
                }

                let flow = self.flow.clone();
                let (room_id, client_id) = (self.room_id, self.client_id);
                match cmd {
                    ClientMsg::Hello { .. } => unreachable!("handled above"),
                    ClientMsg::Join { display_name } => {
                        ctx.spawn(
                            async move { flow.join(room_id, client_id, display_name).await }
                                .into_actor(self)
                                .map(|res, _actor, ctx| match res {
                                    Ok(snapshot) => {
                                        Self::send_json(ctx, &ServerMsg::RoomState { room: snapshot });
                                    }
                                    Err(err) => Self::send_app_error(ctx, &err),
                                }),
                        );
                    }
                    ClientMsg::Leave => {
                        self.dispatch(ctx, async move { flow.leave(room_id, client_id).await });
                    }
                    ClientMsg::Ready => {
                        self.dispatch(ctx, async move { flow.set_ready(room_id, client_id).await });
                    }
                    ClientMsg::Bet { amount } => {
                        self.dispatch(ctx, async move {
                            flow.place_bet(room_id, client_id, amount).await
                        });
                    }
                    ClientMsg::Hit => {
                        self.dispatch(ctx, async move { flow.hit(room_id, client_id).await });
                    }
                    ClientMsg::Stand => {
                        self.dispatch(ctx, async move { flow.stand(room_id, client_id).await });
                    }
                    ClientMsg::DoubleDown => {
                        self.dispatch(ctx, async move {
                            flow.double_down(room_id, client_id).await
                        });
                    }
                    ClientMsg::NextRound => {
                        self.dispatch(ctx, async move {
                            flow.next_round(room_id, client_id).await
                        });
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        code: "BAD_REQUEST".to_string(),
                        message: "Binary not supported".to_string(),
                    },
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    room_id = %self.room_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<OutboundFrame> for WsSession {
    type Result = ();

    fn handle(&mut self, frame: OutboundFrame, ctx: &mut Self::Context) -> Self::Result {
        ctx.text(&*frame.0);
    }
}
