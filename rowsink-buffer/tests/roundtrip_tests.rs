use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowsink_buffer::{RowBuffer, RowBufferConfig};
use rowsink_stats::i256;
use rowsink_test_utils::row;
use rowsink_types::{ColumnDescriptor, PhysicalType, Value};

const MAX_38_DIGITS: i128 = 99_999_999_999_999_999_999_999_999_999_999_999_999;

fn random_in(rng: &mut StdRng, physical: PhysicalType) -> i128 {
    let (lo, hi) = physical.int_range().unwrap();
    rng.gen_range(lo.max(-MAX_38_DIGITS)..=hi.min(MAX_38_DIGITS))
}

/// Any value that fits the physical width is accepted and comes back out of
/// the statistics unchanged.
#[test]
fn in_range_integers_round_trip_through_min_max() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for physical in [
        PhysicalType::Sb1,
        PhysicalType::Sb2,
        PhysicalType::Sb4,
        PhysicalType::Sb8,
        PhysicalType::Sb16,
    ] {
        let buffer = RowBuffer::new(RowBufferConfig::new(physical.name()));
        buffer
            .setup_schema(&[ColumnDescriptor::new("N", physical.name(), "FIXED")])
            .unwrap();

        let values: Vec<i128> = (0..200).map(|_| random_in(&mut rng, physical)).collect();
        let rows: Vec<_> = values.iter().map(|v| row([("n", Value::Int(*v))])).collect();
        buffer.insert_rows(&rows, None).unwrap();

        let stats = buffer.column_stats("N").unwrap().unwrap();
        let min = *values.iter().min().unwrap();
        let max = *values.iter().max().unwrap();
        assert_eq!(stats.current_min_int_value(), Some(i256::from_i128(min)), "{physical}");
        assert_eq!(stats.current_max_int_value(), Some(i256::from_i128(max)), "{physical}");

        let data = buffer.flush().unwrap().unwrap();
        assert_eq!(data.row_count, values.len() as u64);
        assert_eq!(
            data.buffer_size,
            values.len() as u64 * physical.byte_width().unwrap() as u64
        );
    }
}

#[test]
fn width_edges_are_inclusive() {
    for physical in [
        PhysicalType::Sb1,
        PhysicalType::Sb2,
        PhysicalType::Sb4,
        PhysicalType::Sb8,
    ] {
        let buffer = RowBuffer::new(RowBufferConfig::default());
        buffer
            .setup_schema(&[ColumnDescriptor::new("N", physical.name(), "FIXED")])
            .unwrap();
        let (lo, hi) = physical.int_range().unwrap();

        buffer
            .insert_rows(&[row([("n", Value::Int(lo))]), row([("n", Value::Int(hi))])], None)
            .unwrap();
        assert!(
            buffer
                .insert_rows(&[row([("n", Value::Int(hi + 1))])], None)
                .unwrap_err()
                .is_invalid_row()
        );
        assert!(
            buffer
                .insert_rows(&[row([("n", Value::Int(lo - 1))])], None)
                .unwrap_err()
                .is_invalid_row()
        );

        let stats = buffer.column_stats("n").unwrap().unwrap();
        assert_eq!(stats.current_min_int_value(), Some(i256::from_i128(lo)));
        assert_eq!(stats.current_max_int_value(), Some(i256::from_i128(hi)));
        assert_eq!(buffer.row_count().unwrap(), 2);
    }
}

#[test]
fn random_text_min_max_follow_byte_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let buffer = RowBuffer::new(RowBufferConfig::default());
    buffer
        .setup_schema(&[ColumnDescriptor::new("S", "LOB", "TEXT").with_length(12)])
        .unwrap();

    let values: Vec<String> = (0..300)
        .map(|_| {
            let len = rng.gen_range(0..=12);
            (0..len).map(|_| rng.gen_range(b' '..=b'~') as char).collect()
        })
        .collect();
    let rows: Vec<_> = values
        .iter()
        .map(|v| row([("s", Value::from(v.as_str()))]))
        .collect();
    buffer.insert_rows(&rows, None).unwrap();

    let stats = buffer.column_stats("S").unwrap().unwrap();
    assert_eq!(
        stats.current_min_str_value(),
        values.iter().min().map(String::as_str)
    );
    assert_eq!(
        stats.current_max_str_value(),
        values.iter().max().map(String::as_str)
    );
    let mut distinct = values.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(stats.distinct_values(), distinct.len() as u64);
}
