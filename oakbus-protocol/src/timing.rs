//! Response-length prediction and turnaround timing.
//!
//! Delay constants follow the MODBUS over Serial Line implementation guide:
//! at rates above 19200 baud the inter-character and inter-frame times are
//! fixed at 750 us and 1750 us, below that they scale with the baud rate as
//! 15 and 35 bit times.

use std::time::Duration;

use crate::codes;
use crate::frame::MIN_FRAME_LEN;

/// Predict the length of the response to a request frame.
///
/// Pure function of the function code and, for read operations, the
/// requested quantity carried big-endian in octets 4..6 of the request.
/// Unknown function codes predict the minimal frame.
pub fn predicted_response_length(request: &[u8]) -> usize {
    let mut length = MIN_FRAME_LEN;
    let Some(&function) = request.get(1) else {
        return length;
    };
    let quantity = request
        .get(4..6)
        .map(|octets| usize::from(u16::from_be_bytes([octets[0], octets[1]])))
        .unwrap_or(0);

    match function {
        codes::READ_COILS | codes::READ_DISCRETE_INPUTS => {
            length += 1 + quantity.div_ceil(8);
        }
        codes::READ_HOLDING_REGISTERS | codes::READ_INPUT_REGISTERS => {
            length += 1 + quantity * 2;
        }
        codes::WRITE_SINGLE_COIL
        | codes::WRITE_MULTIPLE_COILS
        | codes::WRITE_SINGLE_REGISTER
        | codes::WRITE_MULTIPLE_REGISTERS => {
            length += 4;
        }
        _ => {}
    }
    length
}

/// Minimum wait for `char_count` characters plus one inter-frame gap.
///
/// A zero (unset) baud rate, or one above 19200, falls back to the fixed
/// conservative floor the serial-line guide mandates for fast links.
pub fn response_delay(baud_rate: u32, char_count: usize) -> Duration {
    let (character_delay, frame_delay): (u64, u64) = if baud_rate == 0 || baud_rate > 19200 {
        (750, 1750)
    } else {
        (
            15_000_000 / u64::from(baud_rate),
            35_000_000 / u64::from(baud_rate),
        )
    };
    Duration::from_micros(character_delay * char_count as u64 + frame_delay)
}

/// Minimum wait before the response to `request` can be fully available:
/// the request octets on the wire, the predicted response octets back, and
/// one inter-frame gap.
pub fn turnaround(baud_rate: u32, request: &[u8]) -> Duration {
    response_delay(baud_rate, request.len() + predicted_response_length(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Pdu, data_block, encode};

    fn read_request(function: u8, quantity: u16) -> Vec<u8> {
        encode(1, &Pdu::new(function, data_block(&[0x0001, quantity]))).unwrap()
    }

    #[test]
    fn test_register_read_prediction() {
        // One octet of byte count plus two octets per register.
        assert_eq!(predicted_response_length(&read_request(0x04, 2)), 9);
        assert_eq!(predicted_response_length(&read_request(0x03, 1)), 7);
    }

    #[test]
    fn test_coil_read_prediction_rounds_up() {
        assert_eq!(predicted_response_length(&read_request(0x01, 8)), 6);
        assert_eq!(predicted_response_length(&read_request(0x01, 9)), 7);
        assert_eq!(predicted_response_length(&read_request(0x02, 1)), 6);
    }

    #[test]
    fn test_write_prediction() {
        let request = encode(1, &Pdu::new(0x06, data_block(&[257, 9]))).unwrap();
        assert_eq!(predicted_response_length(&request), 8);
    }

    #[test]
    fn test_unknown_function_predicts_minimum() {
        let request = encode(1, &Pdu::new(0x2B, vec![0x0E, 0x01, 0x00])).unwrap();
        assert_eq!(predicted_response_length(&request), 4);
        assert_eq!(predicted_response_length(&[]), 4);
    }

    #[test]
    fn test_delay_at_9600_baud() {
        // 15_000_000 / 9600 = 1562 us per character, 35_000_000 / 9600 = 3645 us per frame.
        assert_eq!(response_delay(9600, 0), Duration::from_micros(3645));
        assert_eq!(response_delay(9600, 1), Duration::from_micros(5207));
        assert_eq!(response_delay(9600, 10), Duration::from_micros(19265));
    }

    #[test]
    fn test_delay_fixed_floor() {
        // Unset and fast rates use the 750/1750 floor.
        assert_eq!(response_delay(0, 4), Duration::from_micros(4750));
        assert_eq!(response_delay(38400, 4), Duration::from_micros(4750));
        // 19200 itself still scales.
        assert_eq!(response_delay(19200, 0), Duration::from_micros(1822));
    }

    #[test]
    fn test_turnaround_counts_both_directions() {
        let request = read_request(0x04, 2);
        // 8 request octets + 9 predicted response octets.
        assert_eq!(
            turnaround(9600, &request),
            response_delay(9600, request.len() + 9)
        );
    }
}
