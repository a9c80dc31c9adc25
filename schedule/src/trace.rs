use std::io;

use crate::Schedule;

/// Writes one line per step, numbered from `T1`, with batch members separated by `|`.
pub fn write_trace(writer: &mut impl io::Write, schedule: &Schedule) -> io::Result<()> {
    for (index, step) in schedule.iter().enumerate() {
        writeln!(writer, "T{} {step}", index + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::{parse_schedule, write_trace};

    #[test]
    fn test_trace() {
        let schedule = parse_schedule(concat!(
            "[",
            r#"["INPUT", [0, 0], "x"],"#,
            r#"[["NOT", [0, 0], [0, 1], "a"], ["NOT", [0, 0], [1, 0], "b"]],"#,
            r#"["reset", 0, "r"]"#,
            "]",
        ))
        .unwrap();
        let mut buffer = Vec::new();
        write_trace(&mut buffer, &schedule).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            concat!(
                "T1 INPUT (0, 0) x\n",
                "T2 NOT (0, 0) (0, 1) a | NOT (0, 0) (1, 0) b\n",
                "T3 reset 0 r\n",
            )
        );
    }
}
