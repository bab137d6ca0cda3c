//! End-to-end: compose a command with the codec, dispatch it through the
//! registry, and decode it on the receiving side.

use std::sync::mpsc;

use bytes::BytesMut;

use alp_codec::{
    append_read_file_data_action, append_tag_request_action, expected_response_length,
    parse_action, Action, InterfaceConfig,
};
use alp_interface::{AlpInterface, HostInterface, InterfaceError, InterfaceRegistry};

#[test]
fn composed_command_roundtrips_through_host_dispatch() {
    let (tx, rx) = mpsc::channel::<(Vec<u8>, u32)>();
    let mut registry = InterfaceRegistry::new();
    registry
        .register(Box::new(HostInterface::new(move |payload, expected| {
            tx.send((payload.to_vec(), expected)).unwrap();
        })))
        .unwrap();

    let mut command = BytesMut::new();
    append_tag_request_action(&mut command, 0x21, true).unwrap();
    append_read_file_data_action(&mut command, 5, 0, 10, true, false).unwrap();

    let expected = expected_response_length(&command).unwrap();
    let transaction_id = registry
        .dispatch(0x00, &command, expected, None)
        .unwrap();
    assert_eq!(transaction_id, 0);

    let (payload, seen_expected) = rx.recv().unwrap();
    assert_eq!(seen_expected, expected);

    let mut src = payload.as_slice();
    assert!(matches!(
        parse_action(&mut src).unwrap(),
        Action::RequestTag {
            respond_when_completed: true,
            tag_id: 0x21
        }
    ));
    assert!(matches!(
        parse_action(&mut src).unwrap(),
        Action::ReadFileData { length: 10, .. }
    ));
    assert!(src.is_empty());
}

#[test]
fn dispatch_without_registration_invokes_no_send_routine() {
    let (tx, rx) = mpsc::channel::<(Vec<u8>, u32)>();
    let mut registry = InterfaceRegistry::new();
    registry
        .register(Box::new(HostInterface::new(move |payload, expected| {
            tx.send((payload.to_vec(), expected)).unwrap();
        })))
        .unwrap();

    // 0xD7 was never registered; the host handler must stay silent.
    let result = registry.dispatch(0xD7, &[0x00], 0, None);
    assert!(matches!(
        result,
        Err(InterfaceError::NotFound { itf_id: 0xD7 })
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn dispatch_forwards_config_to_the_interface() {
    struct ConfigCapture {
        seen: std::sync::mpsc::Sender<InterfaceConfig>,
    }

    impl AlpInterface for ConfigCapture {
        fn itf_id(&self) -> u8 {
            0xD7
        }

        fn send_command(
            &mut self,
            _payload: &[u8],
            _expected_response_length: u32,
            config: Option<&InterfaceConfig>,
        ) -> Result<u16, alp_interface::SendError> {
            if let Some(config) = config {
                self.seen.send(config.clone()).unwrap();
            }
            Ok(7)
        }
    }

    let (tx, rx) = mpsc::channel();
    let mut registry = InterfaceRegistry::new();
    registry
        .register(Box::new(ConfigCapture { seen: tx }))
        .unwrap();

    let config = InterfaceConfig::d7(alp_codec::D7SessionConfig::default());
    let transaction_id = registry
        .dispatch(0xD7, &[0x00], 0, Some(&config))
        .unwrap();
    assert_eq!(transaction_id, 7);
    assert_eq!(rx.recv().unwrap(), config);
}
