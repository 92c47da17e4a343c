//! End-to-end tests against a server on a loopback socket.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use war_server::client;
use war_server::config::ServerConfig;
use war_server::config::server::CLIENT_CONCURRENCY;
use war_server::game::{Dealer, Deck};
use war_server::server::game_session::messages::ActiveSessions;
use war_server::server::listener;
use war_server::server::matchmaking::messages::QueueLen;
use war_server::server::state::AppState;

const WIN: u8 = 0;
const DRAW: u8 = 1;
const LOSE: u8 = 2;

const WAIT: Duration = Duration::from_secs(5);

async fn start_server(dealer: Dealer, play_timeout: Option<Duration>) -> (SocketAddr, AppState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let mut config = ServerConfig::new(addr);
    if let Some(play_timeout) = play_timeout {
        config = config.with_play_timeout(play_timeout);
    }
    let state = AppState::start(&config, dealer);
    actix::spawn(listener::serve(listener, state.clone()));
    (addr, state)
}

async fn start_fixed_server() -> (SocketAddr, AppState) {
    start_server(Dealer::Fixed(Deck::ordered()), None).await
}

async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        actix::clock::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

async fn wait_queue(state: &AppState, len: usize) {
    let matchmaker = state.matchmaking_addr.clone();
    wait_until(|| {
        let matchmaker = matchmaker.clone();
        async move { matchmaker.send(QueueLen).await.unwrap() == len }
    })
    .await;
}

async fn wait_sessions(state: &AppState, count: usize) {
    let manager = state.game_session_manager.clone();
    wait_until(|| {
        let manager = manager.clone();
        async move { manager.send(ActiveSessions).await.unwrap() == count }
    })
    .await;
}

async fn want_game(addr: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(&[0, 0]).await.unwrap();
    stream
}

async fn read_exact<const N: usize>(stream: &mut TcpStream) -> [u8; N] {
    let mut buf = [0u8; N];
    timeout(WAIT, stream.read_exact(&mut buf))
        .await
        .expect("timed out waiting for the server")
        .unwrap();
    buf
}

async fn read_hand(stream: &mut TcpStream) -> Vec<u8> {
    let message = read_exact::<27>(stream).await;
    assert_eq!(message[0], 1, "expected GAMESTART");
    message[1..].to_vec()
}

async fn play(stream: &mut TcpStream, card: u8) {
    stream.write_all(&[2, card]).await.unwrap();
}

async fn read_result(stream: &mut TcpStream) -> u8 {
    let message = read_exact::<2>(stream).await;
    assert_eq!(message[0], 3, "expected PLAYRESULT");
    message[1]
}

/// The server closes the connection without sending anything else.
async fn expect_closed(stream: &mut TcpStream) {
    let mut buf = [0u8; 32];
    match timeout(WAIT, stream.read(&mut buf)).await {
        Ok(Ok(0)) | Ok(Err(_)) => {}
        Ok(Ok(n)) => panic!("expected close, got {:?}", &buf[..n]),
        Err(_) => panic!("connection still open"),
    }
}

/// Two connections paired in a known order: the first is seat A, holding
/// cards 0..26 from the ordered deck.
async fn paired(addr: SocketAddr, state: &AppState) -> (TcpStream, TcpStream) {
    let mut a = want_game(addr).await;
    wait_queue(state, 1).await;
    let mut b = want_game(addr).await;
    assert_eq!(read_hand(&mut a).await, (0..26).collect::<Vec<u8>>());
    assert_eq!(read_hand(&mut b).await, (26..52).collect::<Vec<u8>>());
    (a, b)
}

#[actix::test]
async fn test_two_clients_play_a_zero_sum_game() {
    let (addr, state) = start_server(Dealer::Shuffled, None).await;
    let (a, b) = tokio::join!(client::play(addr), client::play(addr));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.rounds(), 26);
    assert_eq!(b.rounds(), 26);
    assert_eq!(a.wins, b.losses);
    assert_eq!(a.draws, b.draws);
    assert_eq!(a.net() + b.net(), 0);
    wait_sessions(&state, 0).await;
}

#[actix::test]
async fn test_many_clients_complete() {
    let (addr, state) = start_server(Dealer::Shuffled, None).await;
    assert_eq!(client::play_many(addr, 10, 4).await, 10);
    wait_sessions(&state, 0).await;
    wait_queue(&state, 0).await;
}

#[actix::test]
async fn test_hundreds_of_concurrent_games() {
    let (addr, state) = start_server(Dealer::Shuffled, None).await;
    assert_eq!(client::play_many(addr, 400, CLIENT_CONCURRENCY).await, 400);
    wait_sessions(&state, 0).await;
    wait_queue(&state, 0).await;
}

#[actix::test]
async fn test_round_outcomes_by_rank() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, mut b) = paired(addr, &state).await;

    // Rank 12 beats rank 1.
    play(&mut a, 12).await;
    play(&mut b, 27).await;
    assert_eq!(read_result(&mut a).await, WIN);
    assert_eq!(read_result(&mut b).await, LOSE);

    // Same rank, different suit.
    play(&mut b, 26).await;
    play(&mut a, 0).await;
    assert_eq!(read_result(&mut a).await, DRAW);
    assert_eq!(read_result(&mut b).await, DRAW);
}

#[actix::test]
async fn test_full_game_closes_both_connections() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, mut b) = paired(addr, &state).await;

    for i in 0..26u8 {
        play(&mut a, i).await;
        play(&mut b, 26 + i).await;
        assert_eq!(read_result(&mut a).await, DRAW);
        assert_eq!(read_result(&mut b).await, DRAW);
    }
    expect_closed(&mut a).await;
    expect_closed(&mut b).await;
    wait_sessions(&state, 0).await;
}

#[actix::test]
async fn test_pairs_in_arrival_order() {
    let (addr, state) = start_fixed_server().await;
    let _first = paired(addr, &state).await;
    let (mut c, mut d) = paired(addr, &state).await;

    play(&mut c, 12).await;
    play(&mut d, 27).await;
    assert_eq!(read_result(&mut c).await, WIN);
    assert_eq!(read_result(&mut d).await, LOSE);
    wait_sessions(&state, 2).await;
}

#[actix::test]
async fn test_card_not_in_hand_aborts_game() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, mut b) = paired(addr, &state).await;

    play(&mut a, 30).await;
    expect_closed(&mut a).await;
    expect_closed(&mut b).await;
    wait_sessions(&state, 0).await;
}

#[actix::test]
async fn test_replayed_card_aborts_game() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, mut b) = paired(addr, &state).await;

    play(&mut a, 5).await;
    play(&mut b, 40).await;
    read_result(&mut a).await;
    read_result(&mut b).await;

    play(&mut a, 5).await;
    expect_closed(&mut a).await;
    expect_closed(&mut b).await;
}

#[actix::test]
async fn test_second_card_in_one_round_aborts_game() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, mut b) = paired(addr, &state).await;

    play(&mut a, 1).await;
    play(&mut a, 2).await;
    expect_closed(&mut a).await;
    expect_closed(&mut b).await;
}

#[actix::test]
async fn test_disconnect_mid_game_closes_opponent() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, b) = paired(addr, &state).await;

    play(&mut a, 3).await;
    drop(b);
    expect_closed(&mut a).await;
    wait_sessions(&state, 0).await;
}

#[actix::test]
async fn test_truncated_message_aborts_game() {
    let (addr, state) = start_fixed_server().await;
    let (mut a, mut b) = paired(addr, &state).await;

    a.write_all(&[2]).await.unwrap();
    a.shutdown().await.unwrap();
    expect_closed(&mut b).await;
    wait_sessions(&state, 0).await;
}

#[actix::test]
async fn test_disconnect_while_queued_leaves_queue() {
    let (addr, state) = start_fixed_server().await;
    let lonely = want_game(addr).await;
    wait_queue(&state, 1).await;
    drop(lonely);
    wait_queue(&state, 0).await;

    // The next two pair with each other, not with the departed connection.
    paired(addr, &state).await;
}

#[actix::test]
async fn test_protocol_violations_before_pairing_close_connection() {
    let (addr, state) = start_fixed_server().await;

    let mut unknown = TcpStream::connect(addr).await.unwrap();
    unknown.write_all(&[9, 0]).await.unwrap();
    expect_closed(&mut unknown).await;

    let mut early = TcpStream::connect(addr).await.unwrap();
    early.write_all(&[2, 5]).await.unwrap();
    expect_closed(&mut early).await;

    let mut server_only = TcpStream::connect(addr).await.unwrap();
    server_only.write_all(&[3, 0]).await.unwrap();
    expect_closed(&mut server_only).await;

    let mut twice = want_game(addr).await;
    wait_queue(&state, 1).await;
    twice.write_all(&[0, 0]).await.unwrap();
    expect_closed(&mut twice).await;
    wait_queue(&state, 0).await;
}

#[actix::test]
async fn test_play_timeout_aborts_stalled_game() {
    let (addr, state) = start_server(Dealer::Fixed(Deck::ordered()), Some(Duration::from_millis(200))).await;
    let (mut a, mut b) = paired(addr, &state).await;

    play(&mut a, 0).await;
    expect_closed(&mut a).await;
    expect_closed(&mut b).await;
    wait_sessions(&state, 0).await;
}
