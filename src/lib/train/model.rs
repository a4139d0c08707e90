/*
 * Project::Caldera, a simple LSTM eruption forecaster on synthetic data
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use burn::{
	config::Config,
	module::Module,
	nn::{Dropout, DropoutConfig, Linear, LinearConfig, Lstm, LstmConfig},
	tensor::{activation::sigmoid, backend::Backend, Tensor},
};

/// Two stacked LSTMs read the look-back window, the last hidden state
/// is mapped to a single eruption logit.
#[derive(Module, Debug)]
pub struct LstmNetwork<B: Backend> {
	encoder: Lstm<B>,
	encoder_dropout: Dropout,
	decoder: Lstm<B>,
	decoder_dropout: Dropout,
	output: Linear<B>,
}

#[derive(Config, Debug)]
pub struct LstmNetworkConfig {
	#[config(default = 3)]
	pub input_size: usize,

	#[config(default = 50)]
	pub hidden_size: usize,

	#[config(default = 0.2)]
	pub dropout: f64,
}

impl LstmNetworkConfig {
	pub fn init<B: Backend>(&self, device: &B::Device) -> LstmNetwork<B> {
		LstmNetwork {
			encoder: LstmConfig::new(self.input_size, self.hidden_size, true).init(device),
			encoder_dropout: DropoutConfig::new(self.dropout).init(),
			decoder: LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device),
			decoder_dropout: DropoutConfig::new(self.dropout).init(),
			output: LinearConfig::new(self.hidden_size, 1).init(device),
		}
	}
}

impl<B: Backend> LstmNetwork<B> {
	/// `[batch, look_back, features]` in, `[batch, 1]` logits out.
	pub fn forward(&self, input: &Tensor<B, 3>) -> Tensor<B, 2> {
		let (sequence, _) = self.encoder.forward(input.clone(), None);
		let sequence = self.encoder_dropout.forward(sequence);

		let (sequence, _) = self.decoder.forward(sequence, None);
		let [batch_size, sequence_length, hidden_size] = sequence.dims();

		let last_state = sequence
			.slice([
				0..batch_size,
				sequence_length - 1..sequence_length,
				0..hidden_size,
			])
			.reshape([batch_size, hidden_size]);
		let last_state = self.decoder_dropout.forward(last_state);

		self.output.forward(last_state)
	}

	pub fn forward_probability(&self, input: &Tensor<B, 3>) -> Tensor<B, 2> {
		sigmoid(self.forward(input))
	}
}
