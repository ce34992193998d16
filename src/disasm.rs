use crate::instructions::{Instruction, Opcode};

/// Renders a single instruction-buffer slot the way the reference
/// disassembler does: opcode mnemonics for zero-operand and control
/// instructions, `Load <n> GP`/`Load (<n>) GP`-style addressing with
/// parenthesized negative offsets, and `Word <value>` for the trailing slot
/// of a two-slot instruction.
pub fn disassemble_instruction(instr: Instruction) -> String {
    use Opcode::*;

    match instr.opcode {
        Halt => "Halt".to_owned(),
        Up => "Up".to_owned(),
        Down => "Down".to_owned(),
        Move => "Move".to_owned(),
        Add => "Add".to_owned(),
        Sub => "Sub".to_owned(),
        Neg => "Neg".to_owned(),
        Mul => "Mul".to_owned(),
        Test => "Test".to_owned(),
        Rts => "Rts".to_owned(),

        LoadGp => addressing_text("Load", instr.operand, "GP"),
        LoadFp => addressing_text("Load", instr.operand, "FP"),
        StoreGp => addressing_text("Store", instr.operand, "GP"),
        StoreFp => addressing_text("Store", instr.operand, "FP"),
        ReadGp => addressing_text("Read", instr.operand, "GP"),
        ReadFp => addressing_text("Read", instr.operand, "FP"),

        Jsr => "Jsr".to_owned(),
        Jump => "Jump".to_owned(),
        Jeq => "Jeq".to_owned(),
        Jlt => "Jlt".to_owned(),
        Loadi => "Loadi".to_owned(),
        Pop => "Pop".to_owned(),

        Word => format!("Word {}", instr.operand),
    }
}

fn addressing_text(mnemonic: &str, offset: i32, register: &str) -> String {
    if offset >= 0 {
        format!("{} {} {}", mnemonic, offset, register)
    } else {
        format!("{} ({}) {}", mnemonic, offset, register)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_positive_offset_without_parens() {
        let text = disassemble_instruction(Instruction::new(Opcode::LoadFp, 4));
        assert_eq!("Load 4 FP", text);
    }

    #[test]
    fn renders_negative_offset_parenthesized() {
        let text = disassemble_instruction(Instruction::new(Opcode::LoadFp, -4));
        assert_eq!("Load (-4) FP", text);
    }

    #[test]
    fn renders_word_slot() {
        let text = disassemble_instruction(Instruction::new(Opcode::Word, 12));
        assert_eq!("Word 12", text);
    }

    #[test]
    fn renders_zero_operand_mnemonic() {
        let text = disassemble_instruction(Instruction::zero_operand(Opcode::Rts));
        assert_eq!("Rts", text);
    }
}
