//! Game session actors.
//!
//! `GameSessionManager` creates one `GameSession` per pair handed over by the
//! matchmaker and keeps track of the running ones by id. Each `GameSession`
//! owns its game state and applies the two players' messages one at a time
//! through its mailbox.

use actix::prelude::*;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

use crate::game::{Card, Dealer, GameState, PlayStep, Seat};
use crate::server::game_session::messages::{
    AbortGame, AbortReason, ActiveSessions, CloseMode, CreateGame, PlayCard, PlayerEvent,
    SessionClosed,
};

pub struct GameSession {
    pub game_id: Uuid,
    players: [Recipient<PlayerEvent>; 2],
    state: GameState,
    dealer: Dealer,
    manager: Addr<GameSessionManager>,
    play_timeout: Option<Duration>,
    round_timer: Option<SpawnHandle>,
    closing: bool,
}

impl GameSession {
    fn new(
        game_id: Uuid,
        players: [Recipient<PlayerEvent>; 2],
        dealer: Dealer,
        manager: Addr<GameSessionManager>,
        play_timeout: Option<Duration>,
    ) -> Self {
        Self {
            game_id,
            players,
            state: GameState::new(),
            dealer,
            manager,
            play_timeout,
            round_timer: None,
            closing: false,
        }
    }

    fn player(&self, seat: Seat) -> &Recipient<PlayerEvent> {
        &self.players[seat.index()]
    }

    /// Deal both hands and send each player its GAMESTART.
    fn deal(&mut self, ctx: &mut Context<Self>) {
        let hands = self.dealer.deal();
        let cards: [Vec<Card>; 2] = [hands.0.cards().to_vec(), hands.1.cards().to_vec()];
        if let Err(err) = self.state.deal(hands) {
            warn!("[GameSession] game_id={} could not deal: {}", self.game_id, err);
            self.close_all(CloseMode::Immediate, ctx);
            return;
        }
        info!("[GameSession] game_id={} dealt, awaiting plays", self.game_id);

        for (seat, hand) in Seat::BOTH.into_iter().zip(cards) {
            let event = PlayerEvent::Started {
                game_id: self.game_id,
                seat,
                session: ctx.address(),
                hand,
            };
            // A player that left between pairing and dealing never gets the event.
            self.player(seat)
                .send(event)
                .into_actor(self)
                .then(move |res, act, ctx| {
                    if res.is_err() {
                        act.abort(AbortReason::PeerDisconnect(seat), ctx);
                    }
                    fut::ready(())
                })
                .spawn(ctx);
        }
        self.arm_round_timer(ctx);
    }

    /// (Re)start the timer bounding how long the current round may take.
    fn arm_round_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.round_timer.take() {
            ctx.cancel_future(handle);
        }
        let Some(timeout) = self.play_timeout else {
            return;
        };
        let round = self.state.rounds();
        let handle = ctx.run_later(timeout, move |act, ctx| {
            if act.state.rounds() == round {
                act.abort(AbortReason::PlayTimeout(timeout), ctx);
            }
        });
        self.round_timer = Some(handle);
    }

    fn abort(&mut self, reason: AbortReason, ctx: &mut Context<Self>) {
        if self.closing {
            return;
        }
        self.state.abort();
        warn!("[GameSession] game_id={} aborted: {}", self.game_id, reason);
        self.close_all(CloseMode::Immediate, ctx);
    }

    /// Tell both connections to close and stop the session.
    fn close_all(&mut self, mode: CloseMode, ctx: &mut Context<Self>) {
        self.closing = true;
        if let Some(handle) = self.round_timer.take() {
            ctx.cancel_future(handle);
        }
        for player in &self.players {
            player.do_send(PlayerEvent::Close(mode));
        }
        ctx.stop();
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.deal(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.manager.do_send(SessionClosed {
            game_id: self.game_id,
        });
    }
}

impl Handler<PlayCard> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: PlayCard, ctx: &mut Context<Self>) -> Self::Result {
        if self.closing {
            debug!("[GameSession] game_id={} ignoring {:?} after the game ended", self.game_id, msg);
            return;
        }

        match self.state.play(msg.seat, msg.card) {
            Ok(PlayStep::Waiting) => {
                debug!("[GameSession] game_id={} {} played {}", self.game_id, msg.seat, msg.card);
            }
            Ok(PlayStep::Resolved(round)) => {
                debug!(
                    "[GameSession] game_id={} round {} resolved: {} vs {} -> {:?}",
                    self.game_id,
                    self.state.rounds(),
                    round.cards[0],
                    round.cards[1],
                    round.outcomes
                );
                for seat in Seat::BOTH {
                    self.player(seat)
                        .do_send(PlayerEvent::RoundResult(round.outcome_for(seat)));
                }
                if round.finished {
                    let (a, b) = (self.state.tally(Seat::A), self.state.tally(Seat::B));
                    info!(
                        "[GameSession] game_id={} complete: A {}W/{}D/{}L, B {}W/{}D/{}L",
                        self.game_id, a.wins, a.draws, a.losses, b.wins, b.draws, b.losses
                    );
                    self.close_all(CloseMode::Graceful, ctx);
                } else {
                    self.arm_round_timer(ctx);
                }
            }
            Err(err) => match AbortReason::from_game_error(err) {
                Some(reason) => self.abort(reason, ctx),
                None => debug!("[GameSession] game_id={} ignoring {:?}", self.game_id, msg),
            },
        }
    }
}

impl Handler<AbortGame> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: AbortGame, ctx: &mut Context<Self>) -> Self::Result {
        self.abort(msg.reason, ctx);
    }
}

/// Registry of running sessions, keyed by game id.
pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    dealer: Dealer,
    play_timeout: Option<Duration>,
}

impl GameSessionManager {
    pub fn new(dealer: Dealer, play_timeout: Option<Duration>) -> Self {
        Self {
            sessions: HashMap::new(),
            dealer,
            play_timeout,
        }
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = MessageResult<CreateGame>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        let game_id = Uuid::new_v4();
        let session = GameSession::new(
            game_id,
            msg.players,
            self.dealer.clone(),
            ctx.address(),
            self.play_timeout,
        )
        .start();
        self.sessions.insert(game_id, session);
        debug!("[GameSession] game_id={} created ({} running)", game_id, self.sessions.len());
        MessageResult(game_id)
    }
}

impl Handler<SessionClosed> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: SessionClosed, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            debug!("[GameSession] game_id={} removed ({} running)", msg.game_id, self.sessions.len());
        }
    }
}

impl Handler<ActiveSessions> for GameSessionManager {
    type Result = usize;

    fn handle(&mut self, _: ActiveSessions, _: &mut Context<Self>) -> Self::Result {
        self.sessions.len()
    }
}
