use robochat_core::{BackendError, ChatBackend, ChatError, Message, Role, Session, SessionMemory, Turn};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock backend that records every request and replies from a script.
#[derive(Clone, Default)]
struct ScriptedBackend {
    replies: Arc<Mutex<Vec<Result<Message, BackendError>>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedBackend {
    fn new(mut replies: Vec<Result<Message, BackendError>>) -> Self {
        replies.reverse();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, i: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[i].clone()
    }
}

#[async_trait::async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(Message::assistant("default reply")))
    }
}

/// Backend that never answers.
struct StalledBackend;

#[async_trait::async_trait]
impl ChatBackend for StalledBackend {
    async fn send(&self, _messages: &[Message]) -> Result<Message, BackendError> {
        std::future::pending().await
    }
}

fn session<B: ChatBackend>(backend: B, max_window: usize) -> Session<B> {
    let memory = SessionMemory::new(Message::system("ctx"), max_window).unwrap();
    Session::new(memory, backend, Duration::from_secs(120))
}

#[tokio::test]
async fn test_turn_appends_user_and_reply() {
    let backend = ScriptedBackend::new(vec![Ok(Message::assistant("Elliot"))]);
    let mut session = session(backend.clone(), 20);

    let turn = session.turn("Who is the main character?").await.unwrap();

    assert_eq!(turn, Turn::Reply(Message::assistant("Elliot")));
    assert_eq!(
        session.memory().snapshot(),
        vec![
            Message::system("ctx"),
            Message::user("Who is the main character?"),
            Message::assistant("Elliot"),
        ]
    );
    assert_eq!(
        backend.request(0),
        vec![Message::system("ctx"), Message::user("Who is the main character?")]
    );
}

#[tokio::test]
async fn test_blank_input_is_a_no_op() {
    let backend = ScriptedBackend::default();
    let mut session = session(backend.clone(), 20);

    for input in ["", "   ", "\t", " \n "] {
        assert_eq!(session.turn(input).await.unwrap(), Turn::Skipped);
    }

    assert_eq!(backend.calls(), 0);
    assert!(session.memory().is_empty());
}

#[tokio::test]
async fn test_snapshot_sent_always_starts_with_pinned() {
    let backend = ScriptedBackend::default();
    let mut session = session(backend.clone(), 3);

    for i in 0..6 {
        session.turn(&format!("q{i}")).await.unwrap();
    }

    assert_eq!(backend.calls(), 6);
    for i in 0..6 {
        let request = backend.request(i);
        assert_eq!(request[0], Message::system("ctx"));
        assert!(request.len() <= 4);
    }
    assert_eq!(session.memory().len(), 3);
}

#[tokio::test]
async fn test_snapshot_grows_by_one_after_reply() {
    let backend = ScriptedBackend::default();
    let mut session = session(backend.clone(), 20);

    session.turn("one").await.unwrap();
    session.turn("two").await.unwrap();
    // pinned + u1 + a1 + u2 was sent; the reply takes it to 5
    assert_eq!(backend.request(1).len(), 4);
    assert_eq!(session.memory().snapshot().len(), 5);

    session.turn("three").await.unwrap();
    assert_eq!(backend.request(2).len(), 6);
    assert_eq!(session.memory().snapshot().len(), 7);
}

#[tokio::test]
async fn test_backend_error_does_not_append_reply() {
    let backend = ScriptedBackend::new(vec![
        Ok(Message::assistant("first answer")),
        Err(BackendError::Network("connection refused".into())),
    ]);
    let mut session = session(backend.clone(), 20);

    session.turn("first").await.unwrap();
    let err = session.turn("second").await.unwrap_err();

    assert!(matches!(err, ChatError::Backend(BackendError::Network(_))));
    let snapshot = session.memory().snapshot();
    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.last(), Some(&Message::user("second")));
    assert!(snapshot.iter().filter(|m| m.role() == Role::Assistant).count() == 1);
}

#[tokio::test]
async fn test_non_assistant_reply_is_rejected() {
    let backend = ScriptedBackend::new(vec![Ok(Message::user("echo"))]);
    let mut session = session(backend, 20);

    let err = session.turn("hi").await.unwrap_err();

    assert!(matches!(
        err,
        ChatError::Backend(BackendError::MalformedResponse(_))
    ));
    assert_eq!(session.memory().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_backend_times_out() {
    let mut session = session(StalledBackend, 20);

    let err = session.turn("anyone there?").await.unwrap_err();

    match err {
        ChatError::Backend(BackendError::Timeout(d)) => assert_eq!(d, Duration::from_secs(120)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.memory().len(), 1);
    assert_eq!(session.memory().last_message(), Some(&Message::user("anyone there?")));
}

#[tokio::test]
async fn test_reset_keeps_pinned_context() {
    let backend = ScriptedBackend::default();
    let mut session = session(backend.clone(), 20);

    session.turn("hello").await.unwrap();
    session.reset();
    session.turn("again").await.unwrap();

    assert_eq!(
        backend.request(1),
        vec![Message::system("ctx"), Message::user("again")]
    );
}

#[tokio::test]
async fn test_independent_sessions_share_a_backend() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut a = session(backend.clone(), 20);
    let mut b = session(backend.clone(), 20);

    a.turn("from a").await.unwrap();
    b.turn("from b").await.unwrap();
    a.turn("again a").await.unwrap();

    assert_eq!(a.memory().len(), 4);
    assert_eq!(b.memory().len(), 2);
    assert_eq!(backend.calls(), 3);
}
