//! Integration tests for the oakbus-client library.
//!
//! These drive the engine end to end through a scripted transport; the
//! frames on both sides are real wire frames built by the protocol crate.

use oakbus_client::{
    ClientError, Discovery, RegisterClient, RtuClient, Transport, TransportError,
};
use oakbus_protocol::{ExceptionCode, Pdu, ProtocolError, codes, frame, to_scaled_sequence, value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A serial line stand-in: pops one scripted outcome per exchange and
/// records every request frame it was asked to write.
struct WireScript {
    outcomes: VecDeque<Result<Vec<u8>, TransportError>>,
    written: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl WireScript {
    fn new(outcomes: impl IntoIterator<Item = Result<Vec<u8>, TransportError>>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            written: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle onto the frames written so far; survives moving the
    /// transport into a client.
    fn written(&self) -> Rc<RefCell<Vec<Vec<u8>>>> {
        self.written.clone()
    }
}

impl Transport for WireScript {
    async fn send(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.written.borrow_mut().push(request.to_vec());
        self.outcomes
            .pop_front()
            .unwrap_or(Err(TransportError::NoResponse))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn wire(station: u8, function: u8, data: Vec<u8>) -> Vec<u8> {
    frame::encode(station, &Pdu::new(function, data)).unwrap()
}

/// A station reporting temperature and humidity in tenths: two input
/// register reads, then the readings through the value codec.
#[tokio::test]
async fn test_read_temperature_and_humidity() {
    let transport = WireScript::new([
        Ok(wire(6, codes::READ_INPUT_REGISTERS, vec![0x02, 0x00, 0xC8])),
        Ok(wire(6, codes::READ_INPUT_REGISTERS, vec![0x02, 0x02, 0x8D])),
    ]);
    let mut client = RtuClient::with_station(transport, 6);

    let temperature = client.read_input_registers(1, 1).await.unwrap();
    assert_eq!(
        value::to_scaled(&temperature, value::TENTHS).unwrap(),
        20.0
    );

    let humidity = client.read_input_registers(2, 1).await.unwrap();
    assert_eq!(value::to_scaled(&humidity, value::TENTHS).unwrap(), 65.3);
}

/// Changing a station's address: write the new address to register 257,
/// then confirm by reading it back as a holding register.
#[tokio::test]
async fn test_change_station_address_workflow() {
    let transport = WireScript::new([
        Ok(wire(
            6,
            codes::WRITE_SINGLE_REGISTER,
            vec![0x01, 0x01, 0x00, 0x09],
        )),
        Ok(wire(9, codes::READ_HOLDING_REGISTERS, vec![0x02, 0x00, 0x09])),
    ]);
    let mut client = RtuClient::with_station(transport, 6);

    let echoed = client.write_single_register(257, 9).await.unwrap();
    assert_eq!(echoed, vec![0x00, 0x09]);

    client.set_station(9);
    let stored = client.read_holding_registers(257, 1).await.unwrap();
    assert_eq!(oakbus_protocol::to_unsigned(&stored).unwrap(), 9);
}

/// A multi-register read feeding the sequence decoder.
#[tokio::test]
async fn test_read_register_block() {
    let transport = WireScript::new([Ok(wire(
        1,
        codes::READ_INPUT_REGISTERS,
        vec![0x04, 0x00, 0xC8, 0x02, 0x8D],
    ))]);
    let written = transport.written();
    let mut client = RtuClient::with_station(transport, 1);

    let octets = client.read_input_registers(1, 2).await.unwrap();
    assert_eq!(
        to_scaled_sequence(&octets, value::TENTHS).unwrap(),
        vec![20.0, 65.3]
    );

    // The request carried address and quantity big-endian.
    assert_eq!(
        &written.borrow()[0][..6],
        &[0x01, 0x04, 0x00, 0x01, 0x00, 0x02]
    );
}

/// The failure taxonomy reaches the caller typed, never stringly.
#[tokio::test]
async fn test_failures_are_typed() {
    let transport = WireScript::new([
        Err(TransportError::NoResponse),
        Ok(wire(
            6,
            codes::READ_INPUT_REGISTERS | codes::EXCEPTION_BIT,
            vec![0x02],
        )),
    ]);
    let mut client = RtuClient::with_station(transport, 6);

    let err = client.read_input_registers(1, 1).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::NoResponse)
    ));

    let err = client.read_input_registers(1, 1).await.unwrap_err();
    match err {
        ClientError::Protocol(ProtocolError::Exception { function, code }) => {
            assert_eq!(function, 0x84);
            assert_eq!(code, ExceptionCode::IllegalDataAddress);
        }
        other => panic!("expected an exception, got {:?}", other),
    }
}

/// Discovery keeps scanning through dead and garbled candidates and stops
/// at the first responder.
#[tokio::test]
async fn test_discovery_probe_over_noisy_bus() {
    let mut garbled = wire(2, codes::READ_INPUT_REGISTERS, vec![0x02, 0x00, 0xC8]);
    garbled[4] ^= 0xFF;

    let transport = WireScript::new([
        Err(TransportError::NoResponse),
        Ok(garbled),
        Err(TransportError::UnexpectedData),
        Ok(wire(4, codes::READ_INPUT_REGISTERS, vec![0x02, 0x00, 0xC8])),
    ]);
    let mut client = RtuClient::new(transport);

    let discovery = Discovery::default();
    assert_eq!(discovery.probe(&mut client).await, Some(4));
    assert_eq!(client.station(), 4);
}
