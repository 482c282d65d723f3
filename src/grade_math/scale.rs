/// 标准等级表，按最低百分比降序排列
pub const DEFAULT_SCALE: [(&str, f64); 13] = [
    ("A+", 97.0),
    ("A", 93.0),
    ("A-", 90.0),
    ("B+", 87.0),
    ("B", 83.0),
    ("B-", 80.0),
    ("C+", 77.0),
    ("C", 73.0),
    ("C-", 70.0),
    ("D+", 67.0),
    ("D", 63.0),
    ("D-", 60.0),
    ("F", 0.0),
];

/// 按标准等级表映射百分比
pub fn letter_grade(percentage: f64) -> &'static str {
    letter_grade_with(percentage, &DEFAULT_SCALE)
}

/// 按给定等级表映射百分比
///
/// 顺序扫描，返回第一个最低分不超过 `percentage` 的等级；都不满足时返回 "F"。
pub fn letter_grade_with<'a>(percentage: f64, scale: &[(&'a str, f64)]) -> &'a str {
    scale
        .iter()
        .find(|(_, min)| percentage >= *min)
        .map(|(letter, _)| *letter)
        .unwrap_or("F")
}

/// 等级对应的绩点，未知等级为 0
pub fn gpa_points(letter: &str) -> f64 {
    match letter {
        "A+" | "A" => 4.0,
        "A-" => 3.7,
        "B+" => 3.3,
        "B" => 3.0,
        "B-" => 2.7,
        "C+" => 2.3,
        "C" => 2.0,
        "C-" => 1.7,
        "D+" => 1.3,
        "D" => 1.0,
        "D-" => 0.7,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(letter: &str) -> usize {
        DEFAULT_SCALE
            .iter()
            .position(|(l, _)| *l == letter)
            .unwrap()
    }

    #[test]
    fn test_letter_grade_bounds() {
        assert_eq!(letter_grade(100.0), "A+");
        assert_eq!(letter_grade(0.0), "F");
        assert_eq!(letter_grade(97.0), "A+");
        assert_eq!(letter_grade(96.99), "A");
        assert_eq!(letter_grade(90.0), "A-");
        assert_eq!(letter_grade(59.99), "F");
    }

    #[test]
    fn test_letter_grade_negative_falls_back_to_f() {
        assert_eq!(letter_grade(-5.0), "F");
    }

    #[test]
    fn test_letter_grade_is_monotonic() {
        let mut previous = rank(letter_grade(100.0));
        let mut p = 100.0;
        while p >= 0.0 {
            let current = rank(letter_grade(p));
            assert!(current >= previous, "scale went up at {p}");
            previous = current;
            p -= 0.25;
        }
    }

    #[test]
    fn test_custom_scale() {
        let pass_fail = [("P", 50.0), ("NP", 0.0)];
        assert_eq!(letter_grade_with(75.0, &pass_fail), "P");
        assert_eq!(letter_grade_with(10.0, &pass_fail), "NP");
        assert_eq!(letter_grade_with(10.0, &[("P", 50.0)]), "F");
    }

    #[test]
    fn test_gpa_points() {
        assert_eq!(gpa_points("A+"), 4.0);
        assert_eq!(gpa_points("A"), 4.0);
        assert_eq!(gpa_points("B-"), 2.7);
        assert_eq!(gpa_points("D-"), 0.7);
        assert_eq!(gpa_points("F"), 0.0);
        assert_eq!(gpa_points("Z"), 0.0);
    }
}
