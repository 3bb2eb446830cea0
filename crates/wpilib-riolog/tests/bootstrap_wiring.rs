//! ---
//! wpi_section: "02-riolog-ipc"
//! wpi_subsection: "tests"
//! wpi_type: "test"
//! wpi_scope: "code"
//! wpi_description: "Log-window event wiring against recording collaborators."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::cell::RefCell;
use std::rc::Rc;

use wpilib_riolog::{
    in_memory_pair, InMemoryTransport, LogSession, LogWindowBootstrap, PrintMessage,
    ReceiveMessage, RioLogError, RioLogWindowView, SendMessage, SharedScript, WindowEvent,
    WindowHost, RIOLOG_PORT,
};

type Calls = Rc<RefCell<Vec<String>>>;

struct Host(Calls);

impl WindowHost for Host {
    fn toggle_dev_tools(&self) {
        self.0.borrow_mut().push("dev_tools".into());
    }

    fn reload(&self) {
        self.0.borrow_mut().push("reload".into());
    }
}

struct Script(Calls);

impl SharedScript for Script {
    type Body = &'static str;

    fn check_resize(&self, body: &Self::Body) {
        self.0.borrow_mut().push(format!("resize:{}", body));
    }

    fn handle_message(&self, message: SendMessage) {
        self.0.borrow_mut().push(format!("message:{:?}", message));
    }
}

struct Session {
    calls: Calls,
    fail: bool,
}

impl LogSession for Session {
    fn start(&mut self, port: u16) -> Result<(), RioLogError> {
        if self.fail {
            return Err(RioLogError::Session(format!("port {} in use", port)));
        }
        self.calls.borrow_mut().push(format!("start:{}", port));
        Ok(())
    }

    fn dispose(&mut self) {
        self.calls.borrow_mut().push("dispose".into());
    }
}

fn recorded(calls: &Calls) -> Vec<String> {
    calls.borrow().clone()
}

#[test]
fn key_codes_map_to_host_actions() {
    let calls = Calls::default();
    let (_main, view) = in_memory_pair();
    let mut window = LogWindowBootstrap::new(
        Host(calls.clone()),
        Script(calls.clone()),
        Session { calls: calls.clone(), fail: false },
        view,
        "body",
    );

    window.handle_event(WindowEvent::KeyDown(123)).unwrap();
    window.handle_event(WindowEvent::KeyDown(116)).unwrap();
    window.handle_event(WindowEvent::KeyDown(13)).unwrap();
    assert_eq!(recorded(&calls), vec!["dev_tools", "reload"]);
}

#[test]
fn lifecycle_starts_on_load_and_disposes_once() {
    let calls = Calls::default();
    let (_main, view) = in_memory_pair();
    let mut window = LogWindowBootstrap::new(
        Host(calls.clone()),
        Script(calls.clone()),
        Session { calls: calls.clone(), fail: false },
        view,
        "body",
    );

    window.handle_event(WindowEvent::Load).unwrap();
    window.handle_event(WindowEvent::Resize).unwrap();
    window.handle_event(WindowEvent::Unload).unwrap();
    window.handle_event(WindowEvent::Unload).unwrap();
    window.dispose();

    assert!(window.is_disposed());
    assert_eq!(
        recorded(&calls),
        vec![format!("start:{}", RIOLOG_PORT), "resize:body".into(), "dispose".into()]
    );
}

#[test]
fn failed_start_is_returned_unchanged() {
    let calls = Calls::default();
    let (_main, view) = in_memory_pair();
    let mut window = LogWindowBootstrap::new(
        Host(calls.clone()),
        Script(calls.clone()),
        Session { calls: calls.clone(), fail: true },
        view,
        "body",
    );

    let err = window.handle_event(WindowEvent::Load).unwrap_err();
    assert!(matches!(err, RioLogError::Session(ref message) if message == "port 9999 in use"));
    assert!(recorded(&calls).is_empty());
}

#[test]
fn messages_flow_between_window_and_main() {
    let calls = Calls::default();
    let (main, view) = in_memory_pair();
    let window = LogWindowBootstrap::new(
        Host(calls.clone()),
        Script(calls.clone()),
        Session { calls: calls.clone(), fail: false },
        view,
        "body",
    );

    window.send_message(ReceiveMessage::Pause(true)).unwrap();
    window
        .send_message(ReceiveMessage::Save(vec!["line one".into()]))
        .unwrap();
    assert_eq!(main.recv_from_window(), Some(ReceiveMessage::Pause(true)));
    assert_eq!(
        main.recv_from_window(),
        Some(ReceiveMessage::Save(vec!["line one".into()]))
    );

    main.send_to_window(SendMessage::Batch(vec![PrintMessage::print(1.0, 1, "a")]))
        .unwrap();
    main.send_to_window(SendMessage::PauseUpdate(12)).unwrap();
    assert_eq!(window.deliver_messages(), 2);

    let seen = recorded(&calls);
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("message:Batch"));
    assert_eq!(seen[1], "message:PauseUpdate(12)");
}

#[test]
fn failed_send_is_returned_unchanged() {
    let calls = Calls::default();
    let to_main = InMemoryTransport::new();
    let view = RioLogWindowView::new(to_main.clone(), InMemoryTransport::new());
    let window = LogWindowBootstrap::new(
        Host(calls.clone()),
        Script(calls.clone()),
        Session { calls: calls.clone(), fail: false },
        view,
        "body",
    );

    to_main.close();
    let err = window.send_message(ReceiveMessage::Discard).unwrap_err();
    assert!(matches!(err, RioLogError::Transport { transport: "in_memory", .. }));
    assert!(to_main.is_empty());
    assert!(recorded(&calls).is_empty());
}
