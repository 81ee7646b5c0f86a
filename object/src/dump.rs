//! A human-readable walk over a data set,
//! in the spirit of the classic `dcmdump` output:
//! one line per element with tag, VR, a value summary,
//! the value multiplicity and the dictionary keyword.

use dcmio_core::dataset::DataSet;
use dcmio_core::dictionary::DataDictionary;
use dcmio_core::header::Header;
use dcmio_core::value::{PrimitiveValue, Value};
use dcmio_core::{DataElement, VR};
use std::borrow::Cow;
use std::io::{Result as IoResult, Write};

/// The column budget for a value summary line.
const DEFAULT_WIDTH: u32 = 68;

/// Dump the file meta group and the main data set to the given writer,
/// with the section markers of the original dump tool.
/// Attribute keywords are resolved through the given dictionary.
pub fn dump_file<W, D>(
    to: &mut W,
    file_meta: &DataSet,
    metadata: &DataSet,
    dict: &D,
) -> IoResult<()>
where
    W: ?Sized + Write,
    D: DataDictionary,
{
    writeln!(to, "===File Meta Information===")?;
    dump_data_set(to, file_meta, 0, dict)?;
    writeln!(to, "===Dataset===")?;
    dump_data_set(to, metadata, 0, dict)
}

/// Dump every element of the data set at the given indentation depth.
pub fn dump_data_set<W, D>(to: &mut W, data_set: &DataSet, depth: u32, dict: &D) -> IoResult<()>
where
    W: ?Sized + Write,
    D: DataDictionary,
{
    for elem in data_set {
        dump_element(to, elem, DEFAULT_WIDTH, depth, dict)?;
    }
    Ok(())
}

fn dump_element<W, D>(
    to: &mut W,
    elem: &DataElement,
    width: u32,
    depth: u32,
    dict: &D,
) -> IoResult<()>
where
    W: ?Sized + Write,
    D: DataDictionary,
{
    let indent = vec![b' '; (depth * 2) as usize];
    let tag_alias = dict
        .keyword_of(elem.tag())
        .unwrap_or("«Unknown Attribute»");
    to.write_all(&indent)?;

    match elem.value() {
        Value::Sequence(items) => {
            writeln!(
                to,
                "{} {}                                # {},    {}",
                elem.tag(),
                elem.vr(),
                items.len(),
                tag_alias
            )?;
            for item in items {
                let indent: String = " ".repeat(((depth + 1) * 2) as usize);
                writeln!(to, "{}(FFFE,E000) na Item", indent)?;
                dump_data_set(to, item, depth + 2, dict)?;
            }
        }
        Value::Primitive(value) => {
            writeln!(
                to,
                "{} {} {:48} # {}, {} {}",
                elem.tag(),
                elem.vr(),
                value_summary(value, elem.vr(), width),
                value.calculate_byte_len(),
                value.multiplicity(),
                tag_alias
            )?;
        }
    }

    Ok(())
}

fn value_summary(value: &PrimitiveValue, vr: VR, max_characters: u32) -> Cow<str> {
    use PrimitiveValue::*;
    match (value, vr) {
        (F32(values), _) => format_value_list(values, max_characters).into(),
        (F64(values), _) => format_value_list(values, max_characters).into(),
        (I16(values), _) => format_value_list(values, max_characters).into(),
        (U16(values), _) => format_value_list(values, max_characters).into(),
        (I32(values), _) => format_value_list(values, max_characters).into(),
        (U32(values), _) => format_value_list(values, max_characters).into(),
        (I64(values), _) => format_value_list(values, max_characters).into(),
        (U64(values), _) => format_value_list(values, max_characters).into(),
        (U8(values), VR::OB) | (U8(values), VR::UN) => format_value_list(
            values.iter().map(|n| format!("{:#x}", n)),
            max_characters,
        )
        .into(),
        (U8(values), _) => format_value_list(values, max_characters).into(),
        (Strs(values), _) => format_value_list(values, max_characters).into(),
        (Str(value), _) => cut_str(value, max_characters).into_owned().into(),
    }
}

fn format_value_list<I>(values: I, max_characters: u32) -> String
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    let pieces = values.into_iter().take(64);
    let max = max_characters as usize;
    let mut o = String::with_capacity(max);
    for piece in pieces {
        o.push_str(&piece.to_string());
        o.push('\\');
        if o.len() > max {
            break;
        }
    }
    o.pop();
    cut_str(&o, max_characters).into_owned()
}

fn cut_str(s: &str, max_characters: u32) -> Cow<str> {
    let max = (max_characters - 3) as usize;
    if s.len() > max {
        format!("{}...", &s[..max]).into()
    } else {
        s.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_core::dataset::Sequence;
    use dcmio_core::dictionary::StandardDataDictionary;
    use dcmio_core::Tag;

    #[test]
    fn dump_produces_one_line_per_element() {
        let mut ds = DataSet::new();
        ds.insert(DataElement::primitive(
            Tag(0x0008, 0x0060),
            VR::CS,
            PrimitiveValue::from("SM"),
        ))
        .unwrap();
        ds.insert(DataElement::primitive(
            Tag(0x0010, 0x0010),
            VR::PN,
            PrimitiveValue::from("Doe^John"),
        ))
        .unwrap();
        ds.lock();

        let mut out = Vec::new();
        dump_data_set(&mut out, &ds, 0, &StandardDataDictionary).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("(0008,0060) CS"));
        assert!(lines[0].ends_with("Modality"));
        assert!(lines[1].contains("Doe^John"));
        assert!(lines[1].ends_with("PatientName"));
    }

    #[test]
    fn dump_indents_sequence_items() {
        let mut item = DataSet::new();
        item.insert(DataElement::primitive(
            Tag(0x0008, 0x1155),
            VR::UI,
            PrimitiveValue::from("1.2.3"),
        ))
        .unwrap();
        item.lock();
        let mut seq = Sequence::new();
        seq.append(item).unwrap();
        seq.lock();

        let mut ds = DataSet::new();
        ds.insert(DataElement::sequence(Tag(0x0008, 0x1140), seq))
            .unwrap();
        ds.lock();

        let mut out = Vec::new();
        dump_data_set(&mut out, &ds, 0, &StandardDataDictionary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(0008,1140) SQ"));
        assert!(text.contains("  (FFFE,E000) na Item"));
        assert!(text.contains("    (0008,1155) UI"));
    }
}
